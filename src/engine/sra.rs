// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

use super::{exponentiate, AsymmetricBlockCipher, Mode};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::util::{biguint_to_bytes_minimal, biguint_to_bytes_padded};

/// Lifecycle of an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EngineState {
    #[default]
    Uninitialized,
    Initialized { mode: Mode, key: Key },
}

/// The SRA block engine: plain modular exponentiation over the shared
/// modulus.
///
/// Any key kind works in either direction; the key alone decides the
/// exponent. That is what lets each party "encrypt" with its own exponent
/// and "decrypt" with its inverse, in any order relative to the others.
///
/// ## Block format
///
/// Encrypted output is always `(bits(n) + 7) / 8` bytes, left-padded with
/// zeros, so a ciphertext can be fed straight into another party's engine.
/// Decrypted output is the minimal big-endian encoding (zero → empty), so a
/// plaintext comes back exactly as it went in.
#[derive(Debug, Clone, Default)]
pub struct SraEngine {
    state: EngineState,
}

impl SraEngine {
    /// Create an uninitialised engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current direction, or `None` before `init`.
    pub fn mode(&self) -> Option<Mode> {
        match &self.state {
            EngineState::Uninitialized => None,
            EngineState::Initialized { mode, .. } => Some(*mode),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.mode().is_some()
    }

    pub(crate) fn bound(&self) -> Result<(Mode, &Key)> {
        match &self.state {
            EngineState::Uninitialized => Err(Error::not_initialized()),
            EngineState::Initialized { mode, key } => Ok((*mode, key)),
        }
    }

    fn modulus_bits(&self) -> Result<usize> {
        let (_, key) = self.bound()?;
        Ok(key.modulus().bits())
    }

    /// Interpret the requested range as an integer strictly below `n`.
    pub(crate) fn convert_input(&self, input: &[u8], offset: usize, len: usize) -> Result<BigUint> {
        let (_, key) = self.bound()?;
        let n = key.modulus();

        let end = offset
            .checked_add(len)
            .filter(|end| *end <= input.len())
            .ok_or_else(Error::data_length)?;

        let max_len = n.bits().div_ceil(8);
        if len > max_len {
            return Err(Error::data_length());
        }

        let m = BigUint::from_bytes_be(&input[offset..end]);
        if &m >= n {
            return Err(Error::data_length());
        }

        Ok(m)
    }

    pub(crate) fn convert_output(&self, result: &BigUint) -> Result<Vec<u8>> {
        let (mode, key) = self.bound()?;

        let bytes = match mode {
            Mode::Encrypt => biguint_to_bytes_padded(result, key.modulus().bits().div_ceil(8)),
            Mode::Decrypt => biguint_to_bytes_minimal(result),
        };

        Ok(bytes)
    }
}

impl AsymmetricBlockCipher for SraEngine {
    fn init<K: Into<Key>>(&mut self, for_encryption: bool, key: K) {
        let mode = Mode::from_flag(for_encryption);
        let key = key.into();

        tracing::trace!(?mode, key = key.kind(), bits = key.modulus().bits(), "SRA engine initialised");
        self.state = EngineState::Initialized { mode, key };
    }

    fn input_block_size(&self) -> Result<usize> {
        let bits = self.modulus_bits()?;
        Ok(match self.mode() {
            Some(Mode::Encrypt) => (bits - 1) / 8,
            _ => bits.div_ceil(8),
        })
    }

    fn output_block_size(&self) -> Result<usize> {
        let bits = self.modulus_bits()?;
        Ok(match self.mode() {
            Some(Mode::Encrypt) => bits.div_ceil(8),
            _ => (bits - 1) / 8,
        })
    }

    fn process_block(&mut self, input: &[u8], offset: usize, len: usize) -> Result<Vec<u8>> {
        let m = self.convert_input(input, offset, len)?;
        let (_, key) = self.bound()?;

        let result = exponentiate(key, &m);
        self.convert_output(&result)
    }
}
