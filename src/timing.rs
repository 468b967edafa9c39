use std::collections::BTreeMap;
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::RngCore;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::provider::{Digest, PrimitiveProvider};

/// Input hashed on every iteration of the hash benchmark.
pub const HASH_INPUT: &[u8] = b"123";

/// The six benchmarked primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    ScalarMultiply,
    ScalarInvert,
    ScalarAdd,
    Hash,
    GroupAdd,
    GroupScalarMultiply,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::ScalarMultiply,
        OperationKind::ScalarInvert,
        OperationKind::ScalarAdd,
        OperationKind::Hash,
        OperationKind::GroupAdd,
        OperationKind::GroupScalarMultiply,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label used in the cost formulas.
    pub fn notation(self) -> &'static str {
        match self {
            OperationKind::ScalarMultiply => "Tmm",
            OperationKind::ScalarInvert => "Tinv",
            OperationKind::ScalarAdd => "Tma",
            OperationKind::Hash => "Th",
            OperationKind::GroupAdd => "Tpa",
            OperationKind::GroupScalarMultiply => "Tpm",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OperationKind::ScalarMultiply => "scalar multiply",
            OperationKind::ScalarInvert => "scalar invert",
            OperationKind::ScalarAdd => "scalar add",
            OperationKind::Hash => "hash",
            OperationKind::GroupAdd => "group add",
            OperationKind::GroupScalarMultiply => "group scalar multiply",
        };
        write!(f, "{} ({})", name, self.notation())
    }
}

/// Monotonic time source, as an offset from some fixed origin.
pub trait Clock {
    fn now(&mut self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Per-iteration elapsed times, in seconds, for one operation.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingSample {
    kind: OperationKind,
    elapsed: Vec<f64>,
}

impl TimingSample {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn elapsed(&self) -> &[f64] {
        &self.elapsed
    }

    pub fn len(&self) -> usize {
        self.elapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed.is_empty()
    }
}

/// Runs `op` `iterations` times, timing each call on its own.
///
/// Nothing but the call happens between the two clock reads; operands and
/// output storage must already exist. A reading that goes backwards fails
/// the whole measurement instead of being clamped to zero.
pub fn measure<C, F>(
    clock: &mut C,
    kind: OperationKind,
    iterations: usize,
    mut op: F,
) -> Result<TimingSample>
where
    C: Clock + ?Sized,
    F: FnMut(),
{
    if iterations == 0 {
        return Err(Error::InvalidConfiguration(format!(
            "iteration count for {} must be at least 1",
            kind
        )));
    }

    let mut elapsed = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = clock.now();
        op();
        let end = clock.now();
        let delta = end
            .checked_sub(start)
            .ok_or(Error::Timing { operation: kind })?;
        elapsed.push(delta.as_secs_f64());
    }

    Ok(TimingSample { kind, elapsed })
}

/// Mean of a sample, in milliseconds.
pub fn reduce(sample: TimingSample) -> Result<f64> {
    if sample.is_empty() {
        return Err(Error::InvalidConfiguration(format!(
            "empty timing sample for {}",
            sample.kind
        )));
    }

    let total: f64 = sample.elapsed.iter().sum();
    Ok(total / sample.len() as f64 * 1000.0)
}

/// Mean latency in milliseconds for each operation kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeanLatency {
    entries: BTreeMap<OperationKind, f64>,
}

impl MeanLatency {
    pub fn new() -> MeanLatency {
        MeanLatency::default()
    }

    pub fn insert(&mut self, kind: OperationKind, millis: f64) -> Option<f64> {
        self.entries.insert(kind, millis)
    }

    pub fn remove(&mut self, kind: OperationKind) -> Option<f64> {
        self.entries.remove(&kind)
    }

    pub fn get(&self, kind: OperationKind) -> Option<f64> {
        self.entries.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, f64)> + '_ {
        self.entries.iter().map(|(kind, millis)| (*kind, *millis))
    }

    /// All six latencies indexed by [`OperationKind::index`].
    pub fn resolve(&self) -> Result<[f64; 6]> {
        let mut latencies = [0.0; 6];
        for kind in OperationKind::ALL {
            latencies[kind.index()] = self
                .get(kind)
                .ok_or(Error::MissingOperand { operation: kind })?;
        }
        Ok(latencies)
    }
}

impl FromIterator<(OperationKind, f64)> for MeanLatency {
    fn from_iter<I: IntoIterator<Item = (OperationKind, f64)>>(iter: I) -> Self {
        MeanLatency {
            entries: iter.into_iter().collect(),
        }
    }
}

// Randomized inputs plus one output slot per primitive. Built once before
// any timing starts and dropped when the run ends, on every path.
struct Operands<P: PrimitiveProvider> {
    a: P::Scalar,
    b: P::Scalar,
    x: P::Point,
    y: P::Point,
    mul_z: P::Scalar,
    inv_z: P::Scalar,
    add_z: P::Scalar,
    digest: Digest,
    add_g: P::Point,
    mul_g: P::Point,
}

impl<P: PrimitiveProvider> Operands<P> {
    fn acquire(provider: &P, rng: &mut dyn RngCore) -> Result<Operands<P>> {
        Ok(Operands {
            a: provider.random_scalar(rng)?,
            b: provider.random_scalar(rng)?,
            x: provider.random_point(rng)?,
            y: provider.random_point(rng)?,
            mul_z: provider.zero_scalar(),
            inv_z: provider.zero_scalar(),
            add_z: provider.zero_scalar(),
            digest: Digest::default(),
            add_g: provider.identity(),
            mul_g: provider.identity(),
        })
    }
}

impl<P: PrimitiveProvider> Drop for Operands<P> {
    fn drop(&mut self) {
        debug!("released benchmark operands");
    }
}

/// Times every primitive of `provider` and returns the mean of each.
pub fn run<P, C>(
    provider: &P,
    rng: &mut dyn RngCore,
    clock: &mut C,
    config: &Config,
) -> Result<MeanLatency>
where
    P: PrimitiveProvider,
    C: Clock + ?Sized,
{
    if !provider.is_symmetric() {
        return Err(Error::UnsupportedStructure(format!(
            "{} is not a symmetric pairing",
            provider.describe()
        )));
    }
    config.validate()?;

    let iterations = config.iterations;
    info!(iterations, structure = %provider.describe(), "benchmarking primitives");

    let mut ops = Operands::<P>::acquire(provider, rng)?;
    let mut means = MeanLatency::new();
    for kind in OperationKind::ALL {
        let sample = match kind {
            OperationKind::ScalarMultiply => measure(clock, kind, iterations, || {
                provider.scalar_mul(black_box(&mut ops.mul_z), &ops.a, &ops.b)
            }),
            OperationKind::ScalarInvert => measure(clock, kind, iterations, || {
                provider.scalar_invert(black_box(&mut ops.inv_z), &ops.a)
            }),
            OperationKind::ScalarAdd => measure(clock, kind, iterations, || {
                provider.scalar_add(black_box(&mut ops.add_z), &ops.a, &ops.b)
            }),
            OperationKind::Hash => measure(clock, kind, iterations, || {
                provider.hash(black_box(&mut ops.digest), black_box(HASH_INPUT))
            }),
            OperationKind::GroupAdd => measure(clock, kind, iterations, || {
                provider.point_add(black_box(&mut ops.add_g), &ops.x, &ops.y)
            }),
            OperationKind::GroupScalarMultiply => measure(clock, kind, iterations, || {
                provider.point_mul(black_box(&mut ops.mul_g), &ops.x, &ops.a)
            }),
        }?;

        let mean = reduce(sample)?;
        debug!(operation = %kind, mean_ms = mean, "measured");
        means.insert(kind, mean);
    }

    Ok(means)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::pairing::PairingGroup;
    use crate::params::{tests::TOY_A, PairingParams, PairingType};
    use crate::provider::HashFunction;

    // Advances by a fixed step on every reading.
    struct StepClock {
        now: Duration,
        step: Duration,
    }

    impl Clock for StepClock {
        fn now(&mut self) -> Duration {
            self.now += self.step;
            self.now
        }
    }

    // Goes backwards on the n-th reading.
    struct SkewedClock {
        readings: usize,
        skew_at: usize,
    }

    impl Clock for SkewedClock {
        fn now(&mut self) -> Duration {
            self.readings += 1;
            if self.readings == self.skew_at {
                return Duration::ZERO;
            }
            Duration::from_millis(10 * self.readings as u64)
        }
    }

    fn toy_group() -> PairingGroup {
        PairingGroup::new(PairingParams::parse(TOY_A).unwrap(), HashFunction::Sha256)
    }

    #[test]
    fn measure_records_every_iteration() {
        let mut clock = MonotonicClock::new();
        for iterations in [1usize, 2, 17, 100] {
            let mut calls = 0;
            let sample = measure(&mut clock, OperationKind::Hash, iterations, || calls += 1).unwrap();
            assert_eq!(calls, iterations);
            assert_eq!(sample.len(), iterations);
            assert_eq!(sample.kind(), OperationKind::Hash);
            assert!(sample.elapsed().iter().all(|t| *t >= 0.0));
        }
    }

    #[test]
    fn measure_rejects_zero_iterations() {
        let mut clock = MonotonicClock::new();
        let err = measure(&mut clock, OperationKind::ScalarAdd, 0, || {}).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn measure_fails_on_backwards_clock() {
        let mut clock = SkewedClock {
            readings: 0,
            skew_at: 4,
        };
        let err = measure(&mut clock, OperationKind::GroupAdd, 5, || {}).unwrap_err();
        assert!(matches!(
            err,
            Error::Timing {
                operation: OperationKind::GroupAdd
            }
        ));
    }

    #[test]
    fn reduce_is_mean_in_millis() {
        let mut clock = StepClock {
            now: Duration::ZERO,
            step: Duration::from_millis(2),
        };
        let sample = measure(&mut clock, OperationKind::ScalarMultiply, 10, || {}).unwrap();
        let mean = reduce(sample).unwrap();
        assert!((mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn reduce_is_linear() {
        let elapsed = vec![0.001, 0.004, 0.0025, 0.0, 0.0125];
        let c = 3.5;
        let sample = TimingSample {
            kind: OperationKind::Hash,
            elapsed: elapsed.clone(),
        };
        let scaled = TimingSample {
            kind: OperationKind::Hash,
            elapsed: elapsed.iter().map(|t| t * c).collect(),
        };
        let mean = reduce(sample).unwrap();
        let scaled_mean = reduce(scaled).unwrap();
        assert!((scaled_mean - c * mean).abs() < 1e-12);
    }

    #[test]
    fn reduce_rejects_empty_sample() {
        let sample = TimingSample {
            kind: OperationKind::Hash,
            elapsed: Vec::new(),
        };
        assert!(matches!(reduce(sample), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn run_produces_every_operation() {
        let group = toy_group();
        let mut rng = StdRng::seed_from_u64(21);
        let mut clock = MonotonicClock::new();
        let config = Config {
            iterations: 5,
            ..Config::default()
        };

        let means = run(&group, &mut rng, &mut clock, &config).unwrap();
        let latencies = means.resolve().unwrap();
        assert!(latencies.iter().all(|t| *t >= 0.0));
        assert_eq!(means.iter().count(), OperationKind::ALL.len());
    }

    #[test]
    fn run_is_deterministic_under_fake_clock() {
        let group = toy_group();
        let mut rng = StdRng::seed_from_u64(22);
        let mut clock = StepClock {
            now: Duration::ZERO,
            step: Duration::from_micros(500),
        };
        let config = Config {
            iterations: 3,
            ..Config::default()
        };

        let means = run(&group, &mut rng, &mut clock, &config).unwrap();
        for kind in OperationKind::ALL {
            assert!((means.get(kind).unwrap() - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn run_rejects_asymmetric_structure_before_timing() {
        let params = PairingParams::parse("type f\nq 205523667896953300194896352429254920972540065223\n").unwrap();
        let group = PairingGroup::new(params, HashFunction::Sha256);
        let mut rng = StdRng::seed_from_u64(23);
        // any reading would panic
        struct UnreadableClock;
        impl Clock for UnreadableClock {
            fn now(&mut self) -> Duration {
                panic!("clock read before structure check");
            }
        }

        let err = run(&group, &mut rng, &mut UnreadableClock, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStructure(_)));
    }

    #[test]
    fn run_fails_when_no_operand_can_be_sampled() {
        // bypasses parse-time validation: every point has order dividing 84
        let params = PairingParams {
            kind: PairingType::A,
            q: BigUint::from(83u32),
            r: BigUint::from(1u32),
            h: BigUint::from(84u32),
            raw: BTreeMap::new(),
        };
        let group = PairingGroup::new(params, HashFunction::Sha256);
        let mut rng = StdRng::seed_from_u64(25);
        let mut clock = MonotonicClock::new();
        let err = run(&group, &mut rng, &mut clock, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStructure(_)));
    }

    #[test]
    fn run_rejects_zero_iterations() {
        let group = toy_group();
        let mut rng = StdRng::seed_from_u64(24);
        let mut clock = MonotonicClock::new();
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        let err = run(&group, &mut rng, &mut clock, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn resolve_reports_missing_operand() {
        let mut means: MeanLatency = OperationKind::ALL.iter().map(|k| (*k, 1.0)).collect();
        means.remove(OperationKind::ScalarInvert);
        assert!(matches!(
            means.resolve(),
            Err(Error::MissingOperand {
                operation: OperationKind::ScalarInvert
            })
        ));
    }
}
