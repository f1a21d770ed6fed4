// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-modulus generation.
//!
//! Every party in an SRA session uses the same modulus `n = p·q`. The
//! factors are produced here, once, and handed to each party's
//! [`KeyPairGenerator`](crate::KeyPairGenerator).
//!
//! ## Strength constraints
//!
//! For a modulus of `strength` bits the factors must satisfy:
//!
//! - `bits(p·q) == strength`
//! - `bits(|p − q|) ≥ strength / 3`, so Fermat factoring stays out of reach
//! - NAF weight of `p·q` ≥ `strength / 4`, since low-weight composites fall
//!   to a special number field sieve (Schirokauer, "The number field sieve
//!   for integers of low weight")
//!
//! ## Termination
//!
//! The search draws fresh primes until all constraints hold. It is
//! unbounded by default and terminates almost surely for any strength of
//! at least [`MIN_STRENGTH`] bits; strengths below ~100 bits are only
//! useful for tests. Set [`ParametersGenerator::max_attempts`] to turn a
//! runaway search into [`Error::GenerationExhausted`].

use std::fmt;

use num_bigint_dig::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::util::naf::naf_weight;
use crate::util::prime::{is_probable_prime, random_prime};
use crate::{Error, Result};

/// Smallest modulus the generator accepts.
pub const MIN_STRENGTH: usize = 8;

/// Default modulus size in bits.
pub const DEFAULT_STRENGTH: usize = 2048;

/// Default primality certainty: false-positive probability ≤ 2^-80.
pub const DEFAULT_CERTAINTY: usize = 80;

/// Validated factors of a shared modulus.
///
/// Construction re-checks every strength constraint, so a value of this
/// type always describes an acceptable modulus. The factors are wiped on
/// drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct GenerationParameters {
    p: BigUint,
    q: BigUint,
    #[zeroize(skip)]
    strength: usize,
    #[zeroize(skip)]
    certainty: usize,
}

impl GenerationParameters {
    /// Validate externally supplied factors.
    ///
    /// Fails with [`Error::InvalidParameters`] if either factor is not a
    /// probable prime, the product is not exactly `strength` bits, the
    /// factors are too close together or the product's NAF weight is too
    /// low.
    pub fn new(p: BigUint, q: BigUint, strength: usize, certainty: usize) -> Result<Self> {
        if strength < MIN_STRENGTH {
            return Err(Error::InvalidParameters(format!(
                "strength must be at least {MIN_STRENGTH} bits, got {strength}"
            )));
        }

        if !is_probable_prime(&p, certainty) {
            return Err(Error::InvalidParameters("p is probably NOT prime".into()));
        }
        if !is_probable_prime(&q, certainty) {
            return Err(Error::InvalidParameters("q is probably NOT prime".into()));
        }

        let n = &p * &q;
        if n.bits() != strength {
            return Err(Error::InvalidParameters(format!(
                "modulus has {} bits, expected {strength}",
                n.bits()
            )));
        }

        if separation_bits(&p, &q) < min_separation_bits(strength) {
            return Err(Error::InvalidParameters("p and q lie too close together".into()));
        }

        if naf_weight(&n) < min_naf_weight(strength) {
            return Err(Error::InvalidParameters("NAF weight of the modulus is too low".into()));
        }

        Ok(Self { p, q, strength, certainty })
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    #[inline]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// The shared modulus `p·q`.
    pub fn modulus(&self) -> BigUint {
        &self.p * &self.q
    }

    /// Modulus size in bits.
    #[inline]
    pub fn strength(&self) -> usize {
        self.strength
    }

    #[inline]
    pub fn certainty(&self) -> usize {
        self.certainty
    }
}

impl PartialEq for GenerationParameters {
    fn eq(&self, other: &Self) -> bool {
        self.certainty == other.certainty && self.p == other.p && self.q == other.q
    }
}

impl Eq for GenerationParameters {}

impl fmt::Debug for GenerationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationParameters")
            .field("strength", &self.strength)
            .field("certainty", &self.certainty)
            .finish_non_exhaustive()
    }
}

/// Builder for searching fresh [`GenerationParameters`].
#[derive(Debug, Clone)]
pub struct ParametersGenerator {
    strength: usize,
    certainty: usize,
    max_attempts: Option<u64>,
}

impl ParametersGenerator {
    /// Create a generator with default parameters (2048-bit modulus,
    /// certainty 80, unbounded search).
    pub fn new() -> Self {
        Self {
            strength: DEFAULT_STRENGTH,
            certainty: DEFAULT_CERTAINTY,
            max_attempts: None,
        }
    }

    /// Set the modulus size in bits.
    pub fn strength(mut self, bits: usize) -> Self {
        self.strength = bits;
        self
    }

    /// Set the primality certainty level.
    pub fn certainty(mut self, certainty: usize) -> Self {
        self.certainty = certainty;
        self
    }

    /// Cap the number of prime pairs drawn before giving up.
    pub fn max_attempts(mut self, attempts: Option<u64>) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Search with the operating system's random source.
    pub fn generate_with_os_rng(&self) -> Result<GenerationParameters> {
        self.generate(&mut OsRng)
    }

    /// Draw prime pairs from `rng` until one meets every strength constraint.
    pub fn generate<R>(&self, rng: &mut R) -> Result<GenerationParameters>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let strength = self.strength;
        if strength < MIN_STRENGTH {
            return Err(Error::InvalidParameters(format!(
                "strength must be at least {MIN_STRENGTH} bits, got {strength}"
            )));
        }

        // An odd strength gives the extra bit to p so the product can reach it.
        let p_bits = strength.div_ceil(2);
        let q_bits = strength / 2;
        let min_diff_bits = min_separation_bits(strength);
        let min_weight = min_naf_weight(strength);

        let mut attempts = 0u64;
        loop {
            if let Some(limit) = self.max_attempts {
                if attempts >= limit {
                    tracing::debug!(strength, attempts, "parameter search exhausted");
                    return Err(Error::GenerationExhausted { attempts });
                }
            }
            attempts += 1;

            let p = random_prime(p_bits, self.certainty, rng);
            let q = loop {
                let q = random_prime(q_bits, self.certainty, rng);
                if q != p {
                    break q;
                }
            };

            if separation_bits(&p, &q) < min_diff_bits {
                tracing::trace!(attempts, "p and q too close together");
                continue;
            }

            let n = &p * &q;
            if naf_weight(&n) < min_weight {
                tracing::trace!(attempts, "modulus NAF weight too low");
                continue;
            }

            if n.bits() != strength {
                tracing::trace!(attempts, bits = n.bits(), "modulus short of target length");
                continue;
            }

            tracing::debug!(strength, attempts, "generated SRA modulus");
            return GenerationParameters::new(p, q, strength, self.certainty);
        }
    }
}

impl Default for ParametersGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn min_separation_bits(strength: usize) -> usize {
    strength / 3
}

#[inline]
fn min_naf_weight(strength: usize) -> usize {
    strength >> 2
}

/// Bit length of `|p − q|`.
fn separation_bits(p: &BigUint, q: &BigUint) -> usize {
    if p >= q {
        (p - q).bits()
    } else {
        (q - p).bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn assert_strong(params: &GenerationParameters, strength: usize) {
        let n = params.modulus();
        assert_eq!(n.bits(), strength);
        assert!(separation_bits(params.p(), params.q()) >= strength / 3);
        assert!(naf_weight(&n) >= strength / 4);
        assert_ne!(params.p(), params.q());
    }

    #[test]
    fn generates_strong_parameters() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for strength in [12usize, 64, 255, 512] {
            let params = ParametersGenerator::new()
                .strength(strength)
                .certainty(40)
                .generate(&mut rng)
                .unwrap();

            assert_strong(&params, strength);
            assert_eq!(params.strength(), strength);
            assert_eq!(params.certainty(), 40);
        }
    }

    #[test]
    fn tiny_modulus_with_low_certainty() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let params = ParametersGenerator::new().strength(12).certainty(5).generate(&mut rng).unwrap();
        assert_strong(&params, 12);
    }

    #[test]
    fn rejects_strength_below_minimum() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let err = ParametersGenerator::new().strength(4).generate(&mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn bounded_search_gives_up() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let err = ParametersGenerator::new()
            .strength(64)
            .max_attempts(Some(0))
            .generate(&mut rng)
            .unwrap_err();
        assert_eq!(err, Error::GenerationExhausted { attempts: 0 });
    }

    #[test]
    fn accepts_regenerated_factors() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let params = ParametersGenerator::new().strength(128).certainty(40).generate(&mut rng).unwrap();

        let again = GenerationParameters::new(params.p().clone(), params.q().clone(), 128, 40).unwrap();
        assert_eq!(params, again);
    }

    #[test]
    fn rejects_composite_factor() {
        // 3233 = 61 * 53
        let err = GenerationParameters::new(3233u32.into(), 251u32.into(), 20, 20).unwrap_err();
        assert_eq!(err, Error::InvalidParameters("p is probably NOT prime".into()));
    }

    #[test]
    fn rejects_wrong_length() {
        // 61 * 53 = 3233 is a 12-bit modulus
        let err = GenerationParameters::new(61u32.into(), 53u32.into(), 16, 20).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(msg) if msg.contains("12 bits")));
    }

    #[test]
    fn rejects_close_factors() {
        // 61 * 59 = 3599 (12 bits), |61 - 59| = 2 has 2 bits < 12 / 3
        let err = GenerationParameters::new(61u32.into(), 59u32.into(), 12, 20).unwrap_err();
        assert_eq!(err, Error::InvalidParameters("p and q lie too close together".into()));
    }

    #[test]
    fn rejects_low_naf_weight() {
        // 281 * 233 = 65473 = 2^16 - 2^6 - 1, weight 3 < 16 / 4
        let err = GenerationParameters::new(281u32.into(), 233u32.into(), 16, 20).unwrap_err();
        assert_eq!(err, Error::InvalidParameters("NAF weight of the modulus is too low".into()));
    }
}
