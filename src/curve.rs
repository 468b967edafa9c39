use num_bigint::{BigUint, RandBigInt};
use num_modular::ModularCoreOps;
use num_traits::{One, Zero};
use rand::RngCore;
use std::fmt;

use crate::error::{Error, Result};
use crate::{field::Scalar, modular, params::PairingParams};

// Upper bound on x candidates tried by `Curve::random`. About half of all x
// lift to a point, so a valid curve never gets close.
const MAX_SAMPLE_ATTEMPTS: usize = 256;

// Supersingular curve y^2 = x^3 + a*x over F_q (a = 1 for PBC types A and A1).
// Points are kept in Jacobian coordinates (X : Y : Z) ~ (X/Z^2, Y/Z^3).
// See https://hyperelliptic.org/EFD/g1p/auto-shortw-jacobian.html
#[derive(Clone, Debug)]
pub struct Curve {
    pub a: BigUint,
    pub q: BigUint,
    pub r: BigUint,
    pub h: BigUint,
}

#[derive(Clone, Debug)]
pub struct Point {
    pub x: BigUint,
    pub y: BigUint,
    pub z: BigUint,
}

impl Point {
    pub fn infinity() -> Point {
        return Point {
            x: One::one(),
            y: One::one(),
            z: Zero::zero(),
        };
    }

    pub fn from_affine(x: BigUint, y: BigUint) -> Point {
        return Point {
            x,
            y,
            z: One::one(),
        };
    }

    pub fn is_infinity(&self) -> bool {
        return self.z.is_zero();
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_infinity() {
            return write!(f, "O");
        }
        return write!(f, "({} : {} : {})", self.x, self.y, self.z);
    }
}

impl Curve {
    pub fn new(params: &PairingParams) -> Curve {
        return Curve {
            a: One::one(),
            q: params.q.clone(),
            r: params.r.clone(),
            h: params.h.clone(),
        };
    }

    pub fn to_affine(&self, p: &Point) -> Option<(BigUint, BigUint)> {
        let q = &self.q;
        let z_inv = modular::inverse(&p.z, q)?;
        let z_inv2 = (&z_inv).mulm(&z_inv, q);
        let z_inv3 = (&z_inv2).mulm(&z_inv, q);

        return Some(((&p.x).mulm(&z_inv2, q), (&p.y).mulm(&z_inv3, q)));
    }

    pub fn eq(&self, p: &Point, o: &Point) -> bool {
        return match (p.is_infinity(), o.is_infinity()) {
            (true, true) => true,
            (false, false) => self.to_affine(p) == self.to_affine(o),
            _ => false,
        };
    }

    pub fn is_on_curve(&self, p: &Point) -> bool {
        let (x, y) = match self.to_affine(p) {
            None => return true,
            Some(affine) => affine,
        };
        let q = &self.q;
        let lhs = (&y).mulm(&y, q);
        let x3 = (&x).mulm(&x, q).mulm(&x, q);
        let rhs = x3.addm(&(&self.a).mulm(&x, q), q);
        return lhs == rhs;
    }

    // Random point of the order-r subgroup: lift a random x, then clear the cofactor.
    // Gives up when no candidate survives, e.g. when h kills every point.
    pub fn random<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<Point> {
        let q = &self.q;
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let x = rng.gen_biguint_below(q);
            let x3 = (&x).mulm(&x, q).mulm(&x, q);
            let rhs = x3.addm(&(&self.a).mulm(&x, q), q);
            let y = match modular::sqrt_3mod4(&rhs, q) {
                Some(y) => y,
                None => continue,
            };

            let p = self.mul(&Point::from_affine(x, y), &self.h);
            if !p.is_infinity() {
                return Ok(p);
            }
        }

        return Err(Error::UnsupportedStructure(format!(
            "no point of order {} found after {} attempts",
            self.r, MAX_SAMPLE_ATTEMPTS
        )));
    }

    // dbl-2007-bl with a general a
    pub fn double(&self, p: &Point) -> Point {
        if p.is_infinity() || p.y.is_zero() {
            return Point::infinity();
        }

        let q = &self.q;
        let xx = (&p.x).mulm(&p.x, q);
        let yy = (&p.y).mulm(&p.y, q);
        let yyyy = (&yy).mulm(&yy, q);
        let zz = (&p.z).mulm(&p.z, q);

        // s = 4 * x * yy
        let s = (&p.x).mulm(&yy, q).mulm(BigUint::from(4u32), q);
        // m = 3 * xx + a * zz^2
        let m = (&xx)
            .mulm(BigUint::from(3u32), q)
            .addm(&(&self.a).mulm(&(&zz).mulm(&zz, q), q), q);

        let x3 = (&m).mulm(&m, q).subm(&(&s).addm(&s, q), q);
        let y3 = (&m)
            .mulm(&(&s).subm(&x3, q), q)
            .subm(&(&yyyy).mulm(BigUint::from(8u32), q), q);
        let z3 = (&p.y).mulm(&p.z, q).mulm(BigUint::from(2u32), q);

        return Point {
            x: x3,
            y: y3,
            z: z3,
        };
    }

    // add-1998-cmo-2
    pub fn add(&self, p: &Point, o: &Point) -> Point {
        if p.is_infinity() {
            return o.clone();
        }
        if o.is_infinity() {
            return p.clone();
        }

        let q = &self.q;
        let z1z1 = (&p.z).mulm(&p.z, q);
        let z2z2 = (&o.z).mulm(&o.z, q);
        let u1 = (&p.x).mulm(&z2z2, q);
        let u2 = (&o.x).mulm(&z1z1, q);
        let s1 = (&p.y).mulm(&(&o.z).mulm(&z2z2, q), q);
        let s2 = (&o.y).mulm(&(&p.z).mulm(&z1z1, q), q);

        let h = (&u2).subm(&u1, q);
        let r = (&s2).subm(&s1, q);
        if h.is_zero() {
            if r.is_zero() {
                return self.double(p);
            }
            // P + (-P)
            return Point::infinity();
        }

        let hh = (&h).mulm(&h, q);
        let hhh = (&hh).mulm(&h, q);
        let v = (&u1).mulm(&hh, q);

        let x3 = (&r)
            .mulm(&r, q)
            .subm(&hhh, q)
            .subm(&(&v).addm(&v, q), q);
        let y3 = (&r)
            .mulm(&(&v).subm(&x3, q), q)
            .subm(&(&s1).mulm(&hhh, q), q);
        let z3 = (&p.z).mulm(&o.z, q).mulm(&h, q);

        return Point {
            x: x3,
            y: y3,
            z: z3,
        };
    }

    // standard double-and-add, most significant bit first
    pub fn mul(&self, p: &Point, k: &BigUint) -> Point {
        let mut acc = Point::infinity();
        if k.is_zero() || p.is_infinity() {
            return acc;
        }

        for i in (0..k.bits()).rev() {
            acc = self.double(&acc);
            if k.bit(i) {
                acc = self.add(&acc, p);
            }
        }

        return acc;
    }

    pub fn mul_scalar(&self, p: &Point, k: &Scalar) -> Point {
        return self.mul(p, &k.value);
    }
}
