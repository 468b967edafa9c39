use num_bigint::{BigUint, RandBigInt};
use num_modular::ModularCoreOps;
use num_traits::Zero;
use rand::RngCore;
use std::fmt;

use crate::error::{Error, Result};
use crate::modular;

const MAX_SAMPLE_ATTEMPTS: usize = 256;

/// An element of `Z_r`, always kept reduced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar {
    pub value: BigUint,
}

impl Scalar {
    pub fn new(value: BigUint, r: &BigUint) -> Scalar {
        Scalar { value: value % r }
    }

    pub fn zero() -> Scalar {
        Scalar {
            value: BigUint::zero(),
        }
    }

    // Uniform over the non-zero residues, so every sample is invertible.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R, r: &BigUint) -> Result<Scalar> {
        if *r < BigUint::from(2u32) {
            return Err(Error::UnsupportedStructure(format!(
                "scalar field of order {} has no non-zero element",
                r
            )));
        }
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let value = rng.gen_biguint_below(r);
            if !value.is_zero() {
                return Ok(Scalar { value });
            }
        }
        Err(Error::UnsupportedStructure(format!(
            "no non-zero scalar below {} after {} attempts",
            r, MAX_SAMPLE_ATTEMPTS
        )))
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Arithmetic in `Z_r`. Results are written into caller-owned storage.
#[derive(Clone, Debug)]
pub struct ScalarField {
    pub order: BigUint,
}

impl ScalarField {
    pub fn new(order: BigUint) -> ScalarField {
        ScalarField { order }
    }

    pub fn mul(&self, out: &mut Scalar, a: &Scalar, b: &Scalar) {
        out.value = (&a.value).mulm(&b.value, &self.order);
    }

    pub fn add(&self, out: &mut Scalar, a: &Scalar, b: &Scalar) {
        out.value = (&a.value).addm(&b.value, &self.order);
    }

    // Zero has no inverse and maps to zero.
    pub fn invert(&self, out: &mut Scalar, a: &Scalar) {
        out.value = modular::inverse(&a.value, &self.order).unwrap_or_default();
    }
}
