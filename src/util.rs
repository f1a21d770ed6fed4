// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) mod naf;
pub(crate) mod prime;

use num_bigint_dig::{BigInt, BigUint, ModInverse, Sign};
use num_traits::Zero;

/// Computes a⁻¹ mod m in `[0, m)`, or `None` when `a` is not invertible.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let inv = a.clone().mod_inverse(m)?;
    let m = BigInt::from_biguint(Sign::Plus, m.clone());

    (((inv % &m) + &m) % &m).to_biguint()
}

/// Converts a recovered plaintext into its minimal big-endian byte form.
///
/// `m == 0` yields an empty vector rather than `[0]`, so an empty block
/// round-trips to an empty block.
pub(crate) fn biguint_to_bytes_minimal(m: &BigUint) -> Vec<u8> {
    if m.is_zero() {
        return Vec::new();
    }
    m.to_bytes_be()
}

/// Big-endian encoding of `m`, left-padded with zeros to exactly `len` bytes.
///
/// Callers guarantee `m` fits in `len` bytes.
pub(crate) fn biguint_to_bytes_padded(m: &BigUint, len: usize) -> Vec<u8> {
    let bytes = biguint_to_bytes_minimal(m);
    debug_assert!(bytes.len() <= len, "value wider than the requested block");

    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_encodes_as_empty() {
        assert!(biguint_to_bytes_minimal(&BigUint::zero()).is_empty());
        assert_eq!(biguint_to_bytes_padded(&BigUint::zero(), 3), vec![0, 0, 0]);
    }

    #[test]
    fn padding_keeps_value() {
        let m = BigUint::from(0x01_02u32);
        assert_eq!(biguint_to_bytes_padded(&m, 4), vec![0, 0, 1, 2]);
        assert_eq!(biguint_to_bytes_padded(&m, 2), vec![1, 2]);
    }

    #[test]
    fn inverse_of_coprime_value() {
        let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inv, BigUint::from(4u32));
    }

    #[test]
    fn inverse_of_shared_factor_is_none() {
        assert!(mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)).is_none());
    }
}
