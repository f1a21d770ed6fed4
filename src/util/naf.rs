// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

/// Number of non-zero digits in the Non-Adjacent Form of `k`.
///
/// The NAF digits of `k` are non-zero exactly where `3k` and `k` differ
/// in binary, so the weight is the population count of `3k ⊕ k`.
pub(crate) fn naf_weight(k: &BigUint) -> usize {
    let three_k = (k << 1usize) + k;
    let diff = &three_k ^ k;

    diff.to_bytes_le().iter().map(|b| b.count_ones() as usize).sum()
}
