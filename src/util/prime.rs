// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Probable-prime sampling for the factors of the shared modulus.
//!
//! Candidates are drawn uniformly with the top and bottom bits forced, run
//! through a cheap small-prime sieve and then through `probably_prime`
//! with a round count derived from the requested certainty.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand::{CryptoRng, RngCore};

/// Odd primes below 256, used to reject most composites before the
/// expensive test.
const SIEVE_PRIMES: &[u32] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Smallest factor size the sampler can serve; two bits leave only `3`.
pub(crate) const MIN_PRIME_BITS: usize = 3;

/// Miller-Rabin rounds needed for an error probability of at most
/// `2^-certainty`. Each round errs with probability at most 1/4.
#[inline]
pub(crate) const fn rounds_for_certainty(certainty: usize) -> usize {
    let rounds = certainty.div_ceil(2);
    if rounds == 0 {
        1
    } else {
        rounds
    }
}

/// Returns `true` if `n` is a probable prime at the given certainty.
pub(crate) fn is_probable_prime(n: &BigUint, certainty: usize) -> bool {
    probably_prime(n, rounds_for_certainty(certainty))
}

/// Sample a probable prime of exactly `bits` bits.
pub(crate) fn random_prime<R>(bits: usize, certainty: usize, rng: &mut R) -> BigUint
where
    R: RngCore + CryptoRng + ?Sized,
{
    debug_assert!(bits >= MIN_PRIME_BITS, "prime sampling needs at least {MIN_PRIME_BITS} bits");

    let rounds = rounds_for_certainty(certainty);
    let mut candidates = 0u64;

    loop {
        candidates += 1;
        let candidate = generate_candidate(bits, rng);

        if has_small_factor(&candidate) {
            continue;
        }

        if probably_prime(&candidate, rounds) {
            tracing::trace!(bits, candidates, "accepted probable prime");
            return candidate;
        }
    }
}

/// Generate a random candidate of the specified bit length.
///
/// Ensures:
/// - Exact bit length (MSB set)
/// - Odd number (LSB set)
#[inline]
fn generate_candidate<R>(bits: usize, rng: &mut R) -> BigUint
where
    R: RngCore + ?Sized,
{
    let mut candidate = rng.gen_biguint(bits);

    candidate |= BigUint::one() << (bits - 1);
    candidate |= BigUint::one();

    candidate
}

/// Returns true if `n` has a proper divisor among the sieve primes.
///
/// A candidate that *is* one of the sieve primes passes, which matters for
/// the tiny moduli used in tests.
#[inline]
fn has_small_factor(n: &BigUint) -> bool {
    let small = n.to_u32();

    SIEVE_PRIMES
        .iter()
        .any(|&prime| (n % prime).is_zero() && small != Some(prime))
}
