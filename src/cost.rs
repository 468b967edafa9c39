use std::fmt;

use tracing::debug;

use crate::config::validate_aggregation_size;
use crate::error::Result;
use crate::timing::{MeanLatency, OperationKind};

const TPM: OperationKind = OperationKind::GroupScalarMultiply;
const TPA: OperationKind = OperationKind::GroupAdd;
const TMM: OperationKind = OperationKind::ScalarMultiply;
const TMA: OperationKind = OperationKind::ScalarAdd;
const TINV: OperationKind = OperationKind::ScalarInvert;
const TH: OperationKind = OperationKind::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Generation,
    Verification,
    AggregateVerification,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Generation => write!(f, "single signature generation"),
            Metric::Verification => write!(f, "single signature verification"),
            Metric::AggregateVerification => write!(f, "aggregate signature verification"),
        }
    }
}

/// `per_n * n + constant`, where n is the aggregation size. Resolved in
/// floating point, so no aggregation size can overflow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coefficient {
    pub per_n: i64,
    pub constant: i64,
}

impl Coefficient {
    pub fn resolve(&self, n: u64) -> f64 {
        self.per_n as f64 * n as f64 + self.constant as f64
    }
}

const fn fixed(constant: i64) -> Coefficient {
    Coefficient { per_n: 0, constant }
}

const fn per_n(per_n: i64, constant: i64) -> Coefficient {
    Coefficient { per_n, constant }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.per_n, self.constant) {
            (0, c) => write!(f, "{}", c),
            (1, 0) => write!(f, "n"),
            (k, 0) => write!(f, "{}n", k),
            (1, c) if c < 0 => write!(f, "(n-{})", -c),
            (1, c) => write!(f, "(n+{})", c),
            (k, c) if c < 0 => write!(f, "({}n-{})", k, -c),
            (k, c) => write!(f, "({}n+{})", k, c),
        }
    }
}

/// Estimated cost of one metric of one scheme, as a weighted sum of
/// primitive latencies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostFormula {
    pub scheme: &'static str,
    pub metric: Metric,
    pub terms: &'static [(OperationKind, Coefficient)],
}

impl CostFormula {
    /// `latencies` is indexed by [`OperationKind::index`].
    pub fn evaluate(&self, latencies: &[f64; 6], n: u64) -> f64 {
        let mut total = 0.0;
        for (kind, coefficient) in self.terms {
            total += coefficient.resolve(n) * latencies[kind.index()];
        }
        total
    }

    pub fn depends_on_n(&self) -> bool {
        self.terms.iter().any(|(_, c)| c.per_n > 0)
    }
}

impl fmt::Display for CostFormula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (kind, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if *coefficient != fixed(1) {
                write!(f, "{}", coefficient)?;
            }
            write!(f, "{}", kind.notation())?;
        }
        Ok(())
    }
}

const GEN_DOUBLE: &[(OperationKind, Coefficient)] =
    &[(TPM, fixed(1)), (TMA, fixed(2)), (TMM, fixed(2)), (TH, fixed(2))];
const GEN_SINGLE: &[(OperationKind, Coefficient)] =
    &[(TPM, fixed(1)), (TMA, fixed(1)), (TMM, fixed(1)), (TH, fixed(1))];
const VERIFY_FULL: &[(OperationKind, Coefficient)] =
    &[(TPM, fixed(4)), (TPA, fixed(3)), (TH, fixed(3))];
const VERIFY_SHORT: &[(OperationKind, Coefficient)] =
    &[(TPM, fixed(3)), (TPA, fixed(2)), (TH, fixed(2))];

const fn formula(
    scheme: &'static str,
    metric: Metric,
    terms: &'static [(OperationKind, Coefficient)],
) -> CostFormula {
    CostFormula {
        scheme,
        metric,
        terms,
    }
}

/// Compared schemes, in table order. Bracketed names are the reference
/// numbers of the published schemes.
pub const CATALOG: &[CostFormula] = &[
    formula("[19]", Metric::Generation, GEN_DOUBLE),
    formula("[19]", Metric::Verification, VERIFY_FULL),
    formula(
        "[19]",
        Metric::AggregateVerification,
        &[
            (TPM, per_n(3, 1)),
            (TPA, per_n(3, 1)),
            (TMM, per_n(3, -3)),
            (TH, per_n(3, 0)),
            (TMA, per_n(3, -6)),
        ],
    ),
    formula("[25]", Metric::Generation, GEN_DOUBLE),
    formula("[25]", Metric::Verification, VERIFY_SHORT),
    formula(
        "[25]",
        Metric::AggregateVerification,
        &[(TPM, per_n(2, 1)), (TPA, per_n(3, -1)), (TH, per_n(2, 0))],
    ),
    formula("[27]", Metric::Generation, GEN_SINGLE),
    formula("[27]", Metric::Verification, VERIFY_SHORT),
    formula(
        "[27]",
        Metric::AggregateVerification,
        &[
            (TPM, per_n(2, 2)),
            (TPA, per_n(2, 0)),
            (TMM, per_n(2, 0)),
            (TMA, per_n(1, -1)),
            (TH, per_n(3, 0)),
        ],
    ),
    formula(
        "[29]",
        Metric::Generation,
        &[(TPM, fixed(1)), (TMA, fixed(2)), (TMM, fixed(1)), (TH, fixed(1))],
    ),
    formula(
        "[29]",
        Metric::Verification,
        &[(TPM, fixed(3)), (TPA, fixed(3)), (TH, fixed(2))],
    ),
    formula(
        "[29]",
        Metric::AggregateVerification,
        &[
            (TPM, per_n(1, 2)),
            (TPA, per_n(1, 1)),
            (TMM, per_n(2, 0)),
            (TMA, per_n(1, 0)),
            (TH, per_n(2, 0)),
        ],
    ),
    formula("[30]", Metric::Generation, GEN_SINGLE),
    formula(
        "[30]",
        Metric::Verification,
        &[(TPM, fixed(3)), (TPA, fixed(2)), (TH, fixed(1))],
    ),
    formula(
        "[30]",
        Metric::AggregateVerification,
        &[
            (TPM, per_n(2, 1)),
            (TPA, per_n(2, -1)),
            (TMM, per_n(2, 0)),
            (TH, per_n(2, 0)),
            (TMA, per_n(1, -1)),
        ],
    ),
    formula("[32]", Metric::Generation, GEN_DOUBLE),
    formula("[32]", Metric::Verification, VERIFY_FULL),
    formula(
        "[32]",
        Metric::AggregateVerification,
        &[(TPM, per_n(2, 1)), (TPA, per_n(3, -1)), (TH, per_n(3, 0))],
    ),
    formula("[33]", Metric::Generation, GEN_DOUBLE),
    formula("[33]", Metric::Verification, VERIFY_FULL),
    formula(
        "[33]",
        Metric::AggregateVerification,
        &[(TPM, per_n(2, 1)), (TPA, per_n(3, 0)), (TH, per_n(2, 0))],
    ),
    formula(
        "Ours",
        Metric::Generation,
        &[
            (TPM, fixed(1)),
            (TMA, fixed(3)),
            (TMM, fixed(2)),
            (TH, fixed(2)),
            (TINV, fixed(1)),
        ],
    ),
    formula("Ours", Metric::Verification, VERIFY_FULL),
    formula(
        "Ours",
        Metric::AggregateVerification,
        &[(TPM, per_n(2, 0)), (TPA, per_n(3, -1)), (TH, per_n(2, 1))],
    ),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostEntry {
    pub scheme: &'static str,
    pub metric: Metric,
    pub millis: f64,
}

/// Estimated latency of every catalog formula, in catalog order.
#[derive(Clone, Debug, PartialEq)]
pub struct CostReport {
    pub aggregation_size: u64,
    entries: Vec<CostEntry>,
}

impl CostReport {
    pub fn get(&self, scheme: &str, metric: Metric) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.scheme == scheme && e.metric == metric)
            .map(|e| e.millis)
    }

    pub fn entries(&self) -> &[CostEntry] {
        &self.entries
    }

    /// Scheme names in first-seen order.
    pub fn schemes(&self) -> Vec<&'static str> {
        let mut schemes: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            if !schemes.contains(&entry.scheme) {
                schemes.push(entry.scheme);
            }
        }
        schemes
    }
}

/// Evaluates [`CATALOG`] against measured latencies.
pub fn evaluate(means: &MeanLatency, aggregation_size: u64) -> Result<CostReport> {
    evaluate_catalog(CATALOG, means, aggregation_size)
}

pub fn evaluate_catalog(
    catalog: &[CostFormula],
    means: &MeanLatency,
    aggregation_size: u64,
) -> Result<CostReport> {
    validate_aggregation_size(aggregation_size)?;
    let latencies = means.resolve()?;

    let entries = catalog
        .iter()
        .map(|formula| {
            let millis = formula.evaluate(&latencies, aggregation_size);
            debug!(scheme = formula.scheme, metric = ?formula.metric, %formula, millis, "evaluated");
            CostEntry {
                scheme: formula.scheme,
                metric: formula.metric,
                millis,
            }
        })
        .collect();

    Ok(CostReport {
        aggregation_size,
        entries,
    })
}
