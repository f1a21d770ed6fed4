// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};

/// Lower bound a private exponent must exceed: `2^(strength / 2)`.
///
/// Smaller exponents fall to Wiener-style continued-fraction attacks.
pub(crate) fn private_exponent_floor(strength: usize) -> BigUint {
    BigUint::one() << (strength / 2)
}

/// Choose a random public exponent `e` with `1 < e < φ(n)` and
/// `gcd(e, φ(n)) = 1`.
///
/// Candidates are drawn uniformly from `[0, 2^bits(φ(n)))` and rejected
/// until they satisfy both conditions.
pub(crate) fn choose_public_exponent<R>(phi: &BigUint, rng: &mut R) -> BigUint
where
    R: RngCore + CryptoRng + ?Sized,
{
    let one = BigUint::one();
    let bits = phi.bits();

    loop {
        let e = rng.gen_biguint(bits);

        if e.gcd(phi) != one {
            continue;
        }
        if e <= one || &e >= phi {
            continue;
        }

        return e;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn exponent_is_coprime_and_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        // φ(3233) = 60 * 52
        let phi = BigUint::from(3120u32);

        for _ in 0..200 {
            let e = choose_public_exponent(&phi, &mut rng);
            assert!(e > BigUint::one());
            assert!(e < phi);
            assert_eq!(e.gcd(&phi), BigUint::one());
        }
    }

    #[test]
    fn floor_is_half_strength_power() {
        assert_eq!(private_exponent_floor(12), BigUint::from(64u32));
        assert_eq!(private_exponent_floor(2048).bits(), 1025);
    }
}
