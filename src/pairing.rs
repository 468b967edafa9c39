use rand::RngCore;

use crate::curve::{Curve, Point};
use crate::error::Result;
use crate::field::{Scalar, ScalarField};
use crate::params::PairingParams;
use crate::provider::{Digest, HashFunction, PrimitiveProvider};

/// The symmetric pairing group G1 = G2 described by a Type A / A1 parameter
/// set, together with its scalar field `Z_r`.
///
/// The pairing map itself is never evaluated: only the group and field
/// operations feeding the cost model are benchmarked.
#[derive(Clone, Debug)]
pub struct PairingGroup {
    params: PairingParams,
    curve: Curve,
    field: ScalarField,
    hash: HashFunction,
}

impl PairingGroup {
    pub fn new(params: PairingParams, hash: HashFunction) -> PairingGroup {
        let curve = Curve::new(&params);
        let field = ScalarField::new(params.r.clone());
        PairingGroup {
            params,
            curve,
            field,
            hash,
        }
    }

    pub fn params(&self) -> &PairingParams {
        &self.params
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

impl PrimitiveProvider for PairingGroup {
    type Scalar = Scalar;
    type Point = Point;

    fn is_symmetric(&self) -> bool {
        self.params.is_symmetric()
    }

    fn describe(&self) -> String {
        format!(
            "type {} ({}-bit q, {}-bit r, {})",
            self.params.kind,
            self.params.q.bits(),
            self.params.r.bits(),
            self.hash
        )
    }

    fn random_scalar(&self, rng: &mut dyn RngCore) -> Result<Scalar> {
        Scalar::random(rng, &self.field.order)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Result<Point> {
        self.curve.random(rng)
    }

    fn zero_scalar(&self) -> Scalar {
        Scalar::zero()
    }

    fn identity(&self) -> Point {
        Point::infinity()
    }

    fn scalar_mul(&self, out: &mut Scalar, a: &Scalar, b: &Scalar) {
        self.field.mul(out, a, b);
    }

    fn scalar_invert(&self, out: &mut Scalar, a: &Scalar) {
        self.field.invert(out, a);
    }

    fn scalar_add(&self, out: &mut Scalar, a: &Scalar, b: &Scalar) {
        self.field.add(out, a, b);
    }

    fn point_add(&self, out: &mut Point, x: &Point, y: &Point) {
        *out = self.curve.add(x, y);
    }

    fn point_mul(&self, out: &mut Point, x: &Point, k: &Scalar) {
        *out = self.curve.mul_scalar(x, k);
    }

    fn hash(&self, out: &mut Digest, data: &[u8]) {
        self.hash.digest(out, data);
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::params::{tests::TOY_A, TYPE_A};

    #[test]
    fn reference_group_is_symmetric() {
        let group = PairingGroup::new(TYPE_A.clone(), HashFunction::Sha256);
        assert!(group.is_symmetric());
        assert_eq!(group.describe(), "type a (512-bit q, 160-bit r, sha256)");
    }

    #[test]
    fn asymmetric_group_reports_it() {
        let params = PairingParams::parse("type d\nq 9563954090\n").unwrap();
        let group = PairingGroup::new(params, HashFunction::Sha256);
        assert!(!group.is_symmetric());
    }

    #[test]
    fn primitives_agree_with_group_law() {
        let group = PairingGroup::new(PairingParams::parse(TOY_A).unwrap(), HashFunction::Sha256);
        let mut rng = StdRng::seed_from_u64(11);

        let a = group.random_scalar(&mut rng).unwrap();
        let b = group.random_scalar(&mut rng).unwrap();
        let x = group.random_point(&mut rng).unwrap();

        // [a]x + [b]x == [a + b]x
        let mut ax = group.identity();
        let mut bx = group.identity();
        let mut sum = group.identity();
        group.point_mul(&mut ax, &x, &a);
        group.point_mul(&mut bx, &x, &b);
        group.point_add(&mut sum, &ax, &bx);

        let mut ab = group.zero_scalar();
        let mut abx = group.identity();
        group.scalar_add(&mut ab, &a, &b);
        group.point_mul(&mut abx, &x, &ab);
        assert!(group.curve().eq(&sum, &abx));

        // a * a^-1 == 1
        let mut inv = group.zero_scalar();
        let mut one = group.zero_scalar();
        group.scalar_invert(&mut inv, &a);
        group.scalar_mul(&mut one, &a, &inv);
        assert_eq!(one.value, BigUint::one());
    }

    #[test]
    fn hash_is_fixed_output() {
        let group = PairingGroup::new(TYPE_A.clone(), HashFunction::Sha256);
        let mut first = Digest::default();
        let mut second = Digest::default();
        group.hash(&mut first, b"123");
        group.hash(&mut second, b"123");
        assert_eq!(first, second);
    }
}
