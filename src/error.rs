// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Name reported by every engine error raised from this crate.
pub const SCHEME: &str = "SRA";

/// Errors that can occur during parameter generation, key handling and
/// block processing.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Generation parameters violate a strength invariant.
    #[error("Invalid SRA parameters: {0}")]
    InvalidParameters(String),

    /// The engine was used before `init`.
    #[error("{scheme} engine not initialised")]
    NotInitialized { scheme: &'static str },

    /// The input block does not fit below the modulus.
    #[error("input too large for {scheme} cipher")]
    DataLength { scheme: &'static str },

    /// A key pair of the wrong shape or with mismatched moduli.
    #[error("Not a valid SRA key pair: {0}")]
    InvalidKeyPair(String),

    #[error("Invalid SRA public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid SRA private key: {0}")]
    InvalidPrivateKey(String),

    /// The blinded private-key operation failed its consistency check.
    #[error("{scheme} engine faulty decryption detected")]
    FaultyComputation { scheme: &'static str },

    /// A bounded parameter search ran out of attempts.
    #[error("SRA parameter generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u64 },
}

impl Error {
    pub(crate) fn not_initialized() -> Self {
        Error::NotInitialized { scheme: SCHEME }
    }

    pub(crate) fn data_length() -> Self {
        Error::DataLength { scheme: SCHEME }
    }

    pub(crate) fn faulty_computation() -> Self {
        Error::FaultyComputation { scheme: SCHEME }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_name_the_scheme() {
        for err in [Error::not_initialized(), Error::data_length(), Error::faulty_computation()] {
            let message = err.to_string();
            assert!(message.contains("SRA"), "{message}");
            assert!(!message.contains("RSA"), "{message}");
        }
    }

    #[test]
    fn parameter_errors_carry_reason() {
        let err = Error::InvalidParameters("p and q lie too close together".into());
        assert_eq!(err.to_string(), "Invalid SRA parameters: p and q lie too close together");
    }
}
