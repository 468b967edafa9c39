use rand::RngCore;
use sha2::Digest as _;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DIGEST_SIZE: usize = 32;
pub type Digest = [u8; DIGEST_SIZE];

/// The algebraic library being benchmarked.
///
/// Every primitive writes into caller-owned output storage so the timing
/// harness can allocate once and measure only the operation itself.
pub trait PrimitiveProvider {
    type Scalar: Clone;
    type Point: Clone;

    /// Whether the structure pairs a group with itself, which all six
    /// benchmarked primitives assume.
    fn is_symmetric(&self) -> bool;

    fn describe(&self) -> String;

    /// A uniformly random non-zero scalar.
    fn random_scalar(&self, rng: &mut dyn RngCore) -> Result<Self::Scalar>;
    /// A uniformly random element of the pairing group.
    fn random_point(&self, rng: &mut dyn RngCore) -> Result<Self::Point>;

    fn zero_scalar(&self) -> Self::Scalar;
    fn identity(&self) -> Self::Point;

    fn scalar_mul(&self, out: &mut Self::Scalar, a: &Self::Scalar, b: &Self::Scalar);
    fn scalar_invert(&self, out: &mut Self::Scalar, a: &Self::Scalar);
    fn scalar_add(&self, out: &mut Self::Scalar, a: &Self::Scalar, b: &Self::Scalar);
    fn point_add(&self, out: &mut Self::Point, x: &Self::Point, y: &Self::Point);
    fn point_mul(&self, out: &mut Self::Point, x: &Self::Point, k: &Self::Scalar);
    fn hash(&self, out: &mut Digest, data: &[u8]);
}

/// Hash function exposed next to the group operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashFunction {
    #[default]
    Sha256,
    Sha3_256,
}

impl HashFunction {
    pub fn digest(&self, out: &mut Digest, data: &[u8]) {
        match self {
            HashFunction::Sha256 => out.copy_from_slice(&sha2::Sha256::digest(data)),
            HashFunction::Sha3_256 => {
                out.copy_from_slice(&<sha3::Sha3_256 as sha3::Digest>::digest(data))
            }
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HashFunction::Sha256 => write!(f, "sha256"),
            HashFunction::Sha3_256 => write!(f, "sha3-256"),
        }
    }
}

impl FromStr for HashFunction {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashFunction::Sha256),
            "sha3-256" | "sha3_256" => Ok(HashFunction::Sha3_256),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown hash function {}",
                other
            ))),
        }
    }
}
