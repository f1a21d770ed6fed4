// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::util::mod_inverse;
use crate::{Error, Result};

/// Public half of an SRA key: the shared modulus and this party's exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicKey {
    n: BigUint,
    e: BigUint,
}

impl PublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        if n <= BigUint::one() {
            return Err(Error::InvalidPublicKey("modulus must exceed 1".into()));
        }
        if e <= BigUint::one() || e >= n {
            return Err(Error::InvalidPublicKey("exponent out of range".into()));
        }

        Ok(Self { n, e })
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }
}

/// Private key holding only the modulus and the private exponent.
///
/// Exponentiation with this form runs over the full modulus; prefer
/// [`CrtPrivateKey`] whenever the factors are known.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    n: BigUint,
    d: BigUint,
}

impl PrivateKey {
    pub fn new(n: BigUint, d: BigUint) -> Result<Self> {
        if n <= BigUint::one() {
            return Err(Error::InvalidPrivateKey("modulus must exceed 1".into()));
        }
        if d.is_zero() || d >= n {
            return Err(Error::InvalidPrivateKey("exponent out of range".into()));
        }

        Ok(Self { n, d })
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.n.bits())
            .finish_non_exhaustive()
    }
}

/// Private key in Chinese Remainder Theorem form.
///
/// Besides `d` it caches `dP = d mod (p-1)`, `dQ = d mod (q-1)` and
/// `qInv = q⁻¹ mod p`. The cached values are derived exactly once in
/// [`CrtPrivateKey::from_components`]; generation and reconstruction from
/// raw parameters both go through it. Secret fields are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CrtPrivateKey {
    #[zeroize(skip)]
    n: BigUint,
    #[zeroize(skip)]
    e: BigUint,
    d: BigUint,
    p: BigUint,
    q: BigUint,
    dp: BigUint,
    dq: BigUint,
    qinv: BigUint,
}

impl CrtPrivateKey {
    /// Build the CRT form from the two factors and the exponent pair.
    ///
    /// Checks that the factors are distinct, that `q` is invertible mod `p`
    /// and that `e·d ≡ 1 (mod lcm(p-1, q-1))`.
    pub fn from_components(p: BigUint, q: BigUint, e: BigUint, d: BigUint) -> Result<Self> {
        let one = BigUint::one();
        if p <= one || q <= one {
            return Err(Error::InvalidPrivateKey("factors must exceed 1".into()));
        }
        if p == q {
            return Err(Error::InvalidPrivateKey("factors must be distinct".into()));
        }
        if e.is_zero() || d.is_zero() {
            return Err(Error::InvalidPrivateKey("exponents must be non-zero".into()));
        }

        let p_minus_1 = &p - &one;
        let q_minus_1 = &q - &one;

        let lambda = p_minus_1.lcm(&q_minus_1);
        if (&e * &d) % &lambda != one {
            return Err(Error::InvalidPrivateKey("e and d are not inverse modulo λ(n)".into()));
        }

        let qinv = mod_inverse(&q, &p)
            .ok_or_else(|| Error::InvalidPrivateKey("q is not invertible modulo p".into()))?;

        let n = &p * &q;
        let dp = &d % &p_minus_1;
        let dq = &d % &q_minus_1;

        Ok(Self { n, e, d, p, q, dp, dq, qinv })
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    #[inline]
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    #[inline]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// `d mod (p-1)`
    #[inline]
    pub fn dp(&self) -> &BigUint {
        &self.dp
    }

    /// `d mod (q-1)`
    #[inline]
    pub fn dq(&self) -> &BigUint {
        &self.dq
    }

    /// `q⁻¹ mod p`
    #[inline]
    pub fn qinv(&self) -> &BigUint {
        &self.qinv
    }

    /// The matching public key `(n, e)`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey { n: self.n.clone(), e: self.e.clone() }
    }
}

#[cfg(test)]
impl CrtPrivateKey {
    /// Simulate a fault in the `p` half of the CRT computation.
    pub(crate) fn inject_dp_fault(&mut self) {
        self.dp += 1u32;
    }
}

impl fmt::Debug for CrtPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrtPrivateKey")
            .field("bits", &self.n.bits())
            .finish_non_exhaustive()
    }
}

/// Any key the engine can be initialised with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Public(PublicKey),
    Private(PrivateKey),
    PrivateCrt(CrtPrivateKey),
}

impl Key {
    /// The modulus this key operates over.
    pub fn modulus(&self) -> &BigUint {
        match self {
            Key::Public(key) => key.n(),
            Key::Private(key) => key.n(),
            Key::PrivateCrt(key) => key.n(),
        }
    }

    pub fn is_private(&self) -> bool {
        !matches!(self, Key::Public(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Key::Public(_) => "public",
            Key::Private(_) => "private",
            Key::PrivateCrt(_) => "private-crt",
        }
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Key::Public(key)
    }
}

impl From<PrivateKey> for Key {
    fn from(key: PrivateKey) -> Self {
        Key::Private(key)
    }
}

impl From<CrtPrivateKey> for Key {
    fn from(key: CrtPrivateKey) -> Self {
        Key::PrivateCrt(key)
    }
}
