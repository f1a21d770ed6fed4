// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # SRA Commutative Encryption
//!
//! RSA over a modulus shared by every participant, with a private exponent
//! pair per participant. Because all parties exponentiate modulo the same
//! `n`, their encryptions commute:
//!
//! ```text
//! D_A(E_B(E_A(m))) == E_B(m)
//! ```
//!
//! which is what mental-poker style protocols need to shuffle and reveal
//! cards without a trusted dealer.
//!
//! Reference: Shamir, Rivest & Adleman, "Mental Poker" (1979).
//!
//! ## Security
//!
//! The shared factors must satisfy minimum separation and NAF-weight
//! constraints, and every private exponent exceeds `2^(strength/2)`. No
//! padding is applied: messages are raw integers below `n`, since any
//! per-party padding would break commutativity. Private material is
//! zeroized on drop via the `zeroize` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sra::{AsymmetricBlockCipher, KeyPairGenerator, ParametersGenerator, SraEngine};
//!
//! let params = ParametersGenerator::new().strength(2048).certainty(80).generate_with_os_rng()?;
//!
//! let alice = KeyPairGenerator::new(params.clone()).generate_with_os_rng()?;
//! let bob = KeyPairGenerator::new(params).generate_with_os_rng()?;
//!
//! let card = b"ace of spades";
//! let mut engine = SraEngine::new();
//!
//! engine.init(true, alice.public().clone());
//! let a = engine.process_block(card, 0, card.len())?;
//!
//! engine.init(true, bob.public().clone());
//! let ab = engine.process_block(&a, 0, a.len())?;
//!
//! engine.init(false, alice.private().clone());
//! let b = engine.process_block(&ab, 0, ab.len())?;
//!
//! engine.init(false, bob.private().clone());
//! assert_eq!(engine.process_block(&b, 0, b.len())?, card);
//! # Ok::<(), sra::Error>(())
//! ```

mod engine;
mod error;
mod extract;
mod key;
mod keypair;
mod params;
mod util;

pub use engine::*;
pub use error::*;
pub use extract::*;
pub use key::*;
pub use keypair::*;
pub use params::*;
