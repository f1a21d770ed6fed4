// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use num_bigint_dig::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::key::Key;
use crate::keypair::KeyPair;
use crate::{Error, Result};

/// The four numbers that fully determine an SRA key pair.
///
/// This is a transport format: extract it with [`extract_parameters`],
/// move it out of band, and restore the pair with
/// [`KeyPair::from_raw_parameters`]. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawParameters {
    p: BigUint,
    q: BigUint,
    e: BigUint,
    d: BigUint,
}

impl RawParameters {
    pub fn new(p: BigUint, q: BigUint, e: BigUint, d: BigUint) -> Self {
        Self { p, q, e, d }
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    #[inline]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    #[inline]
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}

impl fmt::Debug for RawParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawParameters")
            .field("bits", &(&self.p * &self.q).bits())
            .finish_non_exhaustive()
    }
}

/// Read `(p, q, e, d)` out of a generated key pair.
///
/// The public half must be a plain public key, the private half must be in
/// CRT form, and both must use the same modulus. Anything else is
/// [`Error::InvalidKeyPair`]. Values are copied from the private key as
/// stored; nothing is recomputed.
pub fn extract_parameters(key_pair: &KeyPair) -> Result<RawParameters> {
    let Key::Public(public) = key_pair.public() else {
        return Err(Error::InvalidKeyPair("public half is not a public key".into()));
    };

    let Key::PrivateCrt(private) = key_pair.private() else {
        return Err(Error::InvalidKeyPair("private half is not a CRT private key".into()));
    };

    if public.n() != private.n() {
        return Err(Error::InvalidKeyPair("modulus is different".into()));
    }

    Ok(RawParameters::new(
        private.p().clone(),
        private.q().clone(),
        private.e().clone(),
        private.d().clone(),
    ))
}
