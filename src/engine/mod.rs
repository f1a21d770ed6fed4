// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod blinded;
mod sra;

pub use blinded::BlindedSraEngine;
pub use sra::SraEngine;

use num_bigint_dig::BigUint;

use crate::error::Result;
use crate::key::{CrtPrivateKey, Key};

/// Direction an engine has been initialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    pub fn from_flag(for_encryption: bool) -> Self {
        if for_encryption {
            Mode::Encrypt
        } else {
            Mode::Decrypt
        }
    }
}

/// Raw single-block public-key cipher.
///
/// An engine starts uninitialised. [`init`](Self::init) binds a direction
/// and a key and may be called again at any time to rebind both. Every
/// other method fails with [`Error::NotInitialized`](crate::Error::NotInitialized)
/// until the first `init`.
pub trait AsymmetricBlockCipher {
    /// Bind the engine to `key` for encryption (`true`) or decryption.
    fn init<K: Into<Key>>(&mut self, for_encryption: bool, key: K);

    /// Largest input block in bytes.
    fn input_block_size(&self) -> Result<usize>;

    /// Size in bytes of an output block.
    fn output_block_size(&self) -> Result<usize>;

    /// Process `input[offset..offset + len]` as one big-endian integer.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::DataLength`](crate::Error::DataLength) if the
    /// range lies outside `input`, is wider than the modulus, or encodes a
    /// value not strictly below the modulus.
    fn process_block(&mut self, input: &[u8], offset: usize, len: usize) -> Result<Vec<u8>>;
}

/// `m^k mod n` with the exponent the key carries.
///
/// Public keys use `e`, plain private keys `d`, CRT keys the CRT
/// equivalent of `d`.
pub(crate) fn exponentiate(key: &Key, m: &BigUint) -> BigUint {
    match key {
        Key::Public(key) => m.modpow(key.e(), key.n()),
        Key::Private(key) => m.modpow(key.d(), key.n()),
        Key::PrivateCrt(key) => crt_exponentiate(key, m),
    }
}

/// `c^d mod n` via Garner's recombination.
///
/// `m₁ = c^dP mod p`, `m₂ = c^dQ mod q`, `h = qInv·(m₁ − m₂) mod p`,
/// result `m₂ + h·q`.
pub(crate) fn crt_exponentiate(key: &CrtPrivateKey, c: &BigUint) -> BigUint {
    let p = key.p();
    let q = key.q();

    let m1 = (c % p).modpow(key.dp(), p);
    let m2 = (c % q).modpow(key.dq(), q);

    let m2_mod_p = &m2 % p;
    let diff = if m1 >= m2_mod_p {
        m1 - m2_mod_p
    } else {
        m1 + p - m2_mod_p
    };

    let h = (diff * key.qinv()) % p;
    h * q + m2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{PrivateKey, PublicKey};

    fn toy_crt() -> CrtPrivateKey {
        CrtPrivateKey::from_components(61u32.into(), 53u32.into(), 17u32.into(), 413u32.into())
            .unwrap()
    }

    #[test]
    fn crt_matches_direct_exponentiation() {
        let crt = toy_crt();
        let n = crt.n().clone();
        let plain = Key::from(PrivateKey::new(n.clone(), crt.d().clone()).unwrap());
        let crt = Key::from(crt);

        for m in (0u32..3233).step_by(7) {
            let m = BigUint::from(m);
            assert_eq!(exponentiate(&crt, &m), exponentiate(&plain, &m));
        }
    }

    #[test]
    fn textbook_vector() {
        // 65^17 mod 3233 = 2790, 2790^413 mod 3233 = 65
        let crt = toy_crt();
        let public = Key::from(PublicKey::new(3233u32.into(), 17u32.into()).unwrap());

        let c = exponentiate(&public, &BigUint::from(65u32));
        assert_eq!(c, BigUint::from(2790u32));
        assert_eq!(crt_exponentiate(&crt, &c), BigUint::from(65u32));
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(Mode::from_flag(true), Mode::Encrypt);
        assert_eq!(Mode::from_flag(false), Mode::Decrypt);
    }
}
