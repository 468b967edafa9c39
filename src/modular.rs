use num_bigint::{BigInt, BigUint, Sign};
use num_modular::ModularCoreOps;
use num_traits::{One, Zero};

// Extended Euclid. Returns None when gcd(a, n) != 1, which includes a == 0.
pub fn inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    let mut t0: BigInt = BigInt::zero();
    let mut r0: BigInt = BigInt::from_biguint(Sign::Plus, n.clone());

    let mut t1: BigInt = BigInt::one();
    let mut r1: BigInt = BigInt::from_biguint(Sign::Plus, a % n);

    while !r1.is_zero() {
        let quotient = &r0 / &r1; // non-modular division
        (t0, t1) = (t1.clone(), &t0 - (&quotient * &t1));
        (r0, r1) = (r1.clone(), &r0 - (&quotient * &r1));
    }

    if !r0.is_one() {
        return None;
    }

    // Euclidean algorithm terminates with |t0| < n, so either 0 <= t0 < n or 0 <= (t0 + n) < n
    if t0.sign() == Sign::Minus {
        t0 += BigInt::from_biguint(Sign::Plus, n.clone());
    }

    t0.to_biguint()
}

// Square root modulo a prime p = 3 mod 4, i.e. a^((p+1)/4).
// Returns None when a is not a quadratic residue.
pub fn sqrt_3mod4(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let exp = (p + BigUint::one()) >> 2u32;
    let root = a.modpow(&exp, p);
    if (&root).mulm(&root, p) == a % p {
        return Some(root);
    }

    None
}

// Miller-Rabin over the first twelve prime bases: exact below 3.3 * 10^24,
// probabilistic above.
pub fn is_probable_prime(n: &BigUint) -> bool {
    const BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if *n < BigUint::from(2u32) {
        return false;
    }
    for base in BASES {
        if *n == BigUint::from(base) {
            return true;
        }
        if (n % base).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - BigUint::one();
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for base in BASES {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x).mulm(&x, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}
