use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::modular;

/// Reference Type A parameters (512-bit q, 160-bit r).
pub const TYPE_A_PARAM: &str = include_str!("../params/a.param");

lazy_static! {
    pub static ref TYPE_A: PairingParams =
        PairingParams::parse(TYPE_A_PARAM).expect("built-in type a parameters are well formed");
}

/// The PBC pairing type tag on the first line of a parameter description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairingType {
    A,
    A1,
    Other(String),
}

impl PairingType {
    // Type A and A1 pair a group with itself; everything else is asymmetric
    // or needs arithmetic this crate does not provide.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, PairingType::A | PairingType::A1)
    }
}

impl fmt::Display for PairingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PairingType::A => write!(f, "a"),
            PairingType::A1 => write!(f, "a1"),
            PairingType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

impl FromStr for PairingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a" => Ok(PairingType::A),
            "a1" => Ok(PairingType::A1),
            "" => Err(Error::Params("empty pairing type".into())),
            other => Ok(PairingType::Other(other.to_string())),
        }
    }
}

/// A parsed pairing parameter description.
///
/// For symmetric types the curve is `y^2 = x^3 + x` over `F_q`, with a
/// subgroup of order `r` and cofactor `h` such that `q + 1 = h * r`.
/// Type A1 calls these `p`, `n` and `l`; they are normalized on parse.
#[derive(Clone, Debug, PartialEq)]
pub struct PairingParams {
    pub kind: PairingType,
    pub q: BigUint,
    pub r: BigUint,
    pub h: BigUint,
    // every key/value pair as read, including ones not used here (exp1, sign0, ...)
    pub raw: BTreeMap<String, String>,
}

impl PairingParams {
    pub fn parse(text: &str) -> Result<PairingParams> {
        let mut raw = BTreeMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let key = parts.next().unwrap_or_default();
            let value = parts
                .next()
                .ok_or_else(|| Error::Params(format!("line {}: no value for {}", lineno + 1, key)))?;
            if parts.next().is_some() {
                return Err(Error::Params(format!(
                    "line {}: trailing data after {}",
                    lineno + 1,
                    key
                )));
            }
            if raw.insert(key.to_string(), value.to_string()).is_some() {
                return Err(Error::Params(format!("duplicate key {}", key)));
            }
        }

        let kind: PairingType = raw
            .get("type")
            .ok_or_else(|| Error::Params("missing type".into()))?
            .parse()?;

        let (q_key, r_key, h_key) = match kind {
            PairingType::A => ("q", "r", "h"),
            PairingType::A1 => ("p", "n", "l"),
            // asymmetric types are rejected later, with a better error, by the provider
            PairingType::Other(_) => {
                return Ok(PairingParams {
                    kind,
                    q: BigUint::zero(),
                    r: BigUint::zero(),
                    h: BigUint::zero(),
                    raw,
                })
            }
        };

        let params = PairingParams {
            q: number(&raw, q_key)?,
            r: number(&raw, r_key)?,
            h: number(&raw, h_key)?,
            kind,
            raw,
        };
        params.check()?;

        Ok(params)
    }

    pub fn is_symmetric(&self) -> bool {
        self.kind.is_symmetric()
    }

    fn check(&self) -> Result<()> {
        // a group of order 1 has no element to sample
        if self.r < BigUint::from(2u32) || self.h.is_zero() {
            return Err(Error::Params(
                "group order must be at least 2 and cofactor non-zero".into(),
            ));
        }
        if !modular::is_probable_prime(&self.q) {
            return Err(Error::Params(format!("type {}: q is not prime", self.kind)));
        }
        // type a1 groups have composite order by construction
        if self.kind == PairingType::A && !modular::is_probable_prime(&self.r) {
            return Err(Error::Params("type a: r is not prime".into()));
        }
        if &self.q + BigUint::one() != &self.h * &self.r {
            return Err(Error::Params(format!(
                "type {}: q + 1 is not h * r",
                self.kind
            )));
        }
        // square roots are computed as a^((q+1)/4)
        if &self.q % 4u32 != BigUint::from(3u32) {
            return Err(Error::Params(format!("type {}: q is not 3 mod 4", self.kind)));
        }

        Ok(())
    }
}

fn number(raw: &BTreeMap<String, String>, key: &str) -> Result<BigUint> {
    let value = raw
        .get(key)
        .ok_or_else(|| Error::Params(format!("missing {}", key)))?;
    BigUint::from_str(value).map_err(|_| Error::Params(format!("{} is not a number: {}", key, value)))
}
