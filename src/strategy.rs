//! Named hash strategies and the registry built from them.
//!
//! Every strategy delegates to an established digest crate; nothing here
//! implements a hash function itself. The registry is an explicit value
//! constructed once per invocation and handed to the harness.

use anyhow::Result;
use blake2::{Blake2b512, Blake2s256};
use clap::ValueEnum;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use sha3::{Keccak256, Sha3_256, Sha3_512};
use std::marker::PhantomData;

/// A named digest computation over a byte payload.
///
/// Implementations must be pure with respect to the payload: same bytes in,
/// same hex string out. The payload is borrowed read-only and never mutated.
pub trait HashStrategy {
    fn name(&self) -> &str;

    /// Returns the lowercase hex digest of `payload`.
    fn compute_digest(&self, payload: &[u8]) -> Result<String>;
}

/// Adapter from any RustCrypto `Digest` type to a [`HashStrategy`].
pub struct DigestStrategy<D: Digest> {
    name: &'static str,
    _hasher: PhantomData<D>,
}

impl<D: Digest> DigestStrategy<D> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            _hasher: PhantomData,
        }
    }
}

impl<D: Digest> HashStrategy for DigestStrategy<D> {
    fn name(&self) -> &str {
        self.name
    }

    fn compute_digest(&self, payload: &[u8]) -> Result<String> {
        let mut hasher = D::new();
        hasher.update(payload);
        Ok(hex::encode(hasher.finalize().as_slice()))
    }
}

/// BLAKE3 sits outside the `digest` trait family, so it gets its own strategy.
pub struct Blake3Strategy;

impl HashStrategy for Blake3Strategy {
    fn name(&self) -> &str {
        "BLAKE3 (blake3)"
    }

    fn compute_digest(&self, payload: &[u8]) -> Result<String> {
        Ok(blake3::hash(payload).to_hex().to_string())
    }
}

/// Built-in strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
    Keccak256,
    Blake2b,
    Blake2s,
    Blake3,
}

impl StrategyKind {
    /// Every built-in kind in canonical registration order.
    pub fn all() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Md5,
            StrategyKind::Sha1,
            StrategyKind::Sha224,
            StrategyKind::Sha256,
            StrategyKind::Sha384,
            StrategyKind::Sha512,
            StrategyKind::Sha3_256,
            StrategyKind::Sha3_512,
            StrategyKind::Keccak256,
            StrategyKind::Blake2b,
            StrategyKind::Blake2s,
            StrategyKind::Blake3,
        ]
    }

    pub fn build(&self) -> Box<dyn HashStrategy> {
        match self {
            StrategyKind::Md5 => Box::new(DigestStrategy::<Md5>::new("MD5 (md-5)")),
            StrategyKind::Sha1 => Box::new(DigestStrategy::<Sha1>::new("SHA-1 (sha-1)")),
            StrategyKind::Sha224 => Box::new(DigestStrategy::<Sha224>::new("SHA-224 (sha2)")),
            StrategyKind::Sha256 => Box::new(DigestStrategy::<Sha256>::new("SHA-256 (sha2)")),
            StrategyKind::Sha384 => Box::new(DigestStrategy::<Sha384>::new("SHA-384 (sha2)")),
            StrategyKind::Sha512 => Box::new(DigestStrategy::<Sha512>::new("SHA-512 (sha2)")),
            StrategyKind::Sha3_256 => Box::new(DigestStrategy::<Sha3_256>::new("SHA3-256 (sha3)")),
            StrategyKind::Sha3_512 => Box::new(DigestStrategy::<Sha3_512>::new("SHA3-512 (sha3)")),
            StrategyKind::Keccak256 => {
                Box::new(DigestStrategy::<Keccak256>::new("Keccak-256 (sha3)"))
            }
            StrategyKind::Blake2b => {
                Box::new(DigestStrategy::<Blake2b512>::new("BLAKE2b-512 (blake2)"))
            }
            StrategyKind::Blake2s => {
                Box::new(DigestStrategy::<Blake2s256>::new("BLAKE2s-256 (blake2)"))
            }
            StrategyKind::Blake3 => Box::new(Blake3Strategy),
        }
    }

    /// Hex digest length this kind produces, in characters.
    pub fn digest_len(&self) -> usize {
        match self {
            StrategyKind::Md5 => 32,
            StrategyKind::Sha1 => 40,
            StrategyKind::Sha224 => 56,
            StrategyKind::Sha256
            | StrategyKind::Sha3_256
            | StrategyKind::Keccak256
            | StrategyKind::Blake2s
            | StrategyKind::Blake3 => 64,
            StrategyKind::Sha384 => 96,
            StrategyKind::Sha512 | StrategyKind::Sha3_512 | StrategyKind::Blake2b => 128,
        }
    }
}

/// Builds the boxed strategy registry for a selection, preserving its order.
/// Duplicate kinds are allowed; the resulting duplicate names make name-based
/// lookup ambiguous but keep the run record well-formed.
pub fn build_registry(kinds: &[StrategyKind]) -> Vec<Box<dyn HashStrategy>> {
    kinds.iter().map(|kind| kind.build()).collect()
}
