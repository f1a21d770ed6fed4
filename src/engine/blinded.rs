// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use super::{crt_exponentiate, exponentiate, AsymmetricBlockCipher, SraEngine};
use crate::error::{Error, Result};
use crate::key::{CrtPrivateKey, Key};
use crate::util::mod_inverse;

/// [`SraEngine`] with blinding for CRT private-key operations.
///
/// With a [`Key::PrivateCrt`] bound, the input is multiplied by `r^e` for a
/// fresh random unit `r` before exponentiation and by `r⁻¹` afterwards, so
/// the timing of the secret-exponent step is decorrelated from the input.
/// The unblinded result is then checked with `result^e ≡ input (mod n)`;
/// a mismatch, e.g. from a fault in one CRT half, is reported as
/// [`Error::FaultyComputation`] instead of leaking a value that could
/// factor `n`.
///
/// Other key kinds are processed exactly as [`SraEngine`] does.
#[derive(Debug)]
pub struct BlindedSraEngine<R> {
    engine: SraEngine,
    rng: R,
}

impl BlindedSraEngine<OsRng> {
    /// Blind with the operating system's random source.
    pub fn with_os_rng() -> Self {
        Self::new(OsRng)
    }
}

impl<R> BlindedSraEngine<R>
where
    R: RngCore + CryptoRng,
{
    /// Create an uninitialised engine drawing blinding factors from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            engine: SraEngine::new(),
            rng,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_initialized()
    }

    /// Draw a uniform `r ∈ [1, n)` with a known inverse.
    fn blinding_factor(rng: &mut R, n: &BigUint) -> (BigUint, BigUint) {
        loop {
            let r = rng.gen_biguint_range(&BigUint::one(), n);
            if let Some(r_inv) = mod_inverse(&r, n) {
                return (r, r_inv);
            }
        }
    }

    fn blinded_exponentiate(rng: &mut R, key: &CrtPrivateKey, m: &BigUint) -> Result<BigUint> {
        let n = key.n();
        let e = key.e();

        let (r, r_inv) = Self::blinding_factor(rng, n);
        let blinded = (r.modpow(e, n) * m) % n;

        let result = (crt_exponentiate(key, &blinded) * r_inv) % n;

        if &result.modpow(e, n) != m {
            tracing::debug!("blinded CRT result failed verification");
            return Err(Error::faulty_computation());
        }

        Ok(result)
    }
}

impl<R> AsymmetricBlockCipher for BlindedSraEngine<R>
where
    R: RngCore + CryptoRng,
{
    fn init<K: Into<Key>>(&mut self, for_encryption: bool, key: K) {
        self.engine.init(for_encryption, key);
    }

    fn input_block_size(&self) -> Result<usize> {
        self.engine.input_block_size()
    }

    fn output_block_size(&self) -> Result<usize> {
        self.engine.output_block_size()
    }

    fn process_block(&mut self, input: &[u8], offset: usize, len: usize) -> Result<Vec<u8>> {
        let m = self.engine.convert_input(input, offset, len)?;
        let (_, key) = self.engine.bound()?;

        let result = match key {
            Key::PrivateCrt(key) => Self::blinded_exponentiate(&mut self.rng, key, &m)?,
            other => exponentiate(other, &m),
        };

        self.engine.convert_output(&result)
    }
}
