// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod util;

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::extract::RawParameters;
use crate::key::{CrtPrivateKey, Key, PublicKey};
use crate::params::GenerationParameters;
use crate::util::mod_inverse;
use crate::Result;

/// A public key and a private key belonging together.
///
/// The container itself does not check that the halves match; pairs built
/// by [`KeyPairGenerator`] or [`KeyPair::from_raw_parameters`] always do,
/// and [`extract_parameters`](crate::extract_parameters) rejects those that
/// don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    public: Key,
    private: Key,
}

impl KeyPair {
    pub fn new(public: impl Into<Key>, private: impl Into<Key>) -> Self {
        Self {
            public: public.into(),
            private: private.into(),
        }
    }

    /// Rebuild a key pair from previously extracted `(p, q, e, d)`.
    ///
    /// `e` and `d` are taken as given; only `n` and the CRT values are
    /// recomputed, with the same derivation the generator uses.
    pub fn from_raw_parameters(raw: &RawParameters) -> Result<Self> {
        let private = CrtPrivateKey::from_components(
            raw.p().clone(),
            raw.q().clone(),
            raw.e().clone(),
            raw.d().clone(),
        )?;
        let public = private.public_key();

        Ok(Self::new(public, private))
    }

    /// The key to encrypt with.
    #[inline]
    pub fn public(&self) -> &Key {
        &self.public
    }

    /// The key to decrypt with.
    #[inline]
    pub fn private(&self) -> &Key {
        &self.private
    }

    /// The public half, if it has the public-key shape.
    pub fn public_key(&self) -> Option<&PublicKey> {
        match &self.public {
            Key::Public(key) => Some(key),
            _ => None,
        }
    }

    /// The private half, if it is in CRT form.
    pub fn crt_private_key(&self) -> Option<&CrtPrivateKey> {
        match &self.private {
            Key::PrivateCrt(key) => Some(key),
            _ => None,
        }
    }
}

/// Derives independent key pairs over one shared modulus.
///
/// Each party builds its own generator from the same
/// [`GenerationParameters`]; the resulting key pairs share `n` but have
/// unrelated exponents, which is what makes their encryptions commute.
#[derive(Debug, Clone)]
pub struct KeyPairGenerator {
    params: GenerationParameters,
}

impl KeyPairGenerator {
    pub fn new(params: GenerationParameters) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Generate a key pair with the operating system's random source.
    pub fn generate_with_os_rng(&self) -> Result<KeyPair> {
        self.generate(&mut OsRng)
    }

    /// Generate a key pair.
    ///
    /// ## Exponents
    ///
    /// `e` is drawn uniformly with `1 < e < φ(n)` and `gcd(e, φ(n)) = 1`, and
    /// `d = e⁻¹ mod λ(n)` with `λ(n) = lcm(p-1, q-1)`. The pair is accepted
    /// only if `d > 2^(strength/2)`; otherwise a new `e` is drawn.
    pub fn generate<R>(&self, rng: &mut R) -> Result<KeyPair>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        // canonical order: p >= q
        let (p, q) = if self.params.p() >= self.params.q() {
            (self.params.p().clone(), self.params.q().clone())
        } else {
            (self.params.q().clone(), self.params.p().clone())
        };

        let p_minus_1 = &p - BigUint::one();
        let q_minus_1 = &q - BigUint::one();
        let phi = &p_minus_1 * &q_minus_1;
        let lambda = p_minus_1.lcm(&q_minus_1);
        let d_floor = util::private_exponent_floor(self.params.strength());

        let mut attempts = 0u64;
        let (e, d) = loop {
            attempts += 1;
            let e = util::choose_public_exponent(&phi, rng);

            let Some(d) = mod_inverse(&e, &lambda) else {
                continue;
            };

            if d > d_floor {
                break (e, d);
            }
            tracing::trace!(attempts, "private exponent below floor, redrawing e");
        };

        tracing::debug!(strength = self.params.strength(), attempts, "generated SRA key pair");

        let private = CrtPrivateKey::from_components(p, q, e, d)?;
        let public = private.public_key();

        Ok(KeyPair::new(public, private))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_parameters;
    use crate::params::ParametersGenerator;
    use crate::Error;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn params(strength: usize, seed: u64) -> GenerationParameters {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        ParametersGenerator::new()
            .strength(strength)
            .certainty(40)
            .generate(&mut rng)
            .unwrap()
    }

    #[test]
    fn generated_exponents_satisfy_rsa_relation() {
        let params = params(256, 21);
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let pair = KeyPairGenerator::new(params.clone()).generate(&mut rng).unwrap();

        let private = pair.crt_private_key().unwrap();
        let public = pair.public_key().unwrap();

        let one = BigUint::one();
        let p1 = private.p() - &one;
        let q1 = private.q() - &one;
        let phi = &p1 * &q1;
        let lambda = p1.lcm(&q1);

        assert_eq!(public.n(), &params.modulus());
        assert_eq!(public.e(), private.e());
        assert!(public.e() > &one && public.e() < &phi);
        assert_eq!(public.e().gcd(&phi), one);
        assert_eq!((private.e() * private.d()) % &lambda, one);
        assert!(private.d() > &util::private_exponent_floor(256));
        assert!(private.p() >= private.q());
    }

    #[test]
    fn tiny_modulus_still_meets_floor() {
        let params = params(12, 23);
        let mut rng = ChaCha20Rng::seed_from_u64(24);

        for _ in 0..20 {
            let pair = KeyPairGenerator::new(params.clone()).generate(&mut rng).unwrap();
            assert!(pair.crt_private_key().unwrap().d() > &BigUint::from(64u32));
        }
    }

    #[test]
    fn parties_share_modulus_not_exponents() {
        let params = params(256, 25);
        let mut rng = ChaCha20Rng::seed_from_u64(26);

        let alice = KeyPairGenerator::new(params.clone()).generate(&mut rng).unwrap();
        let bob = KeyPairGenerator::new(params).generate(&mut rng).unwrap();

        assert_eq!(alice.public().modulus(), bob.public().modulus());
        assert_ne!(alice.public_key().unwrap().e(), bob.public_key().unwrap().e());
    }

    #[test]
    fn raw_reconstruction_matches_generated_fields() {
        let params = params(256, 27);
        let mut rng = ChaCha20Rng::seed_from_u64(28);
        let pair = KeyPairGenerator::new(params).generate(&mut rng).unwrap();

        let raw = extract_parameters(&pair).unwrap();
        let restored = KeyPair::from_raw_parameters(&raw).unwrap();

        let original = pair.crt_private_key().unwrap();
        let rebuilt = restored.crt_private_key().unwrap();

        assert_eq!(original.n().to_bytes_be(), rebuilt.n().to_bytes_be());
        assert_eq!(original.dp().to_bytes_be(), rebuilt.dp().to_bytes_be());
        assert_eq!(original.dq().to_bytes_be(), rebuilt.dq().to_bytes_be());
        assert_eq!(original.qinv().to_bytes_be(), rebuilt.qinv().to_bytes_be());
        assert_eq!(pair, restored);
    }

    #[test]
    fn raw_reconstruction_rejects_foreign_exponent() {
        let params = params(128, 29);
        let mut rng = ChaCha20Rng::seed_from_u64(30);
        let pair = KeyPairGenerator::new(params).generate(&mut rng).unwrap();
        let private = pair.crt_private_key().unwrap();

        let bad_d = private.d() + BigUint::one();
        let raw = RawParameters::new(private.p().clone(), private.q().clone(), private.e().clone(), bad_d);

        assert!(matches!(KeyPair::from_raw_parameters(&raw), Err(Error::InvalidPrivateKey(_))));
    }
}
