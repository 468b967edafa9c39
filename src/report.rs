use std::io::{self, Write};

use crate::cost::{CostReport, Metric};
use crate::timing::{MeanLatency, OperationKind};

// column order of the primitive latency table
const PRIMITIVE_COLUMNS: [OperationKind; 6] = [
    OperationKind::GroupScalarMultiply,
    OperationKind::GroupAdd,
    OperationKind::ScalarMultiply,
    OperationKind::ScalarAdd,
    OperationKind::ScalarInvert,
    OperationKind::Hash,
];

fn millis(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.4} ms", ms),
        None => "-".to_string(),
    }
}

fn rule<W: Write>(out: &mut W, widths: &[usize]) -> io::Result<()> {
    write!(out, "+")?;
    for width in widths {
        write!(out, "{}+", "-".repeat(width + 2))?;
    }
    writeln!(out)
}

fn row<W: Write>(out: &mut W, widths: &[usize], cells: &[String]) -> io::Result<()> {
    write!(out, "|")?;
    for (width, cell) in widths.iter().zip(cells) {
        write!(out, " {:^width$} |", cell, width = width)?;
    }
    writeln!(out)
}

fn table<W: Write>(
    out: &mut W,
    title: &str,
    caption: &str,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
) -> io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    writeln!(out, "{:^w$}", title, w = widths.iter().sum::<usize>() + 3 * widths.len() + 1)?;
    writeln!(out, "{}", caption)?;
    rule(out, &widths)?;
    row(out, &widths, &header)?;
    rule(out, &widths)?;
    for cells in &rows {
        row(out, &widths, cells)?;
        rule(out, &widths)?;
    }
    Ok(())
}

/// Mean latency of each primitive.
pub fn render_primitives<W: Write>(out: &mut W, means: &MeanLatency) -> io::Result<()> {
    let mut header = vec!["Notation".to_string()];
    header.extend(PRIMITIVE_COLUMNS.iter().map(|k| k.notation().to_string()));

    let mut cells = vec!["Time".to_string()];
    cells.extend(PRIMITIVE_COLUMNS.iter().map(|k| millis(means.get(*k))));

    table(
        out,
        "TABLE II",
        "AVERAGE RUNTIME (MS) OF CRYPTOGRAPHIC OPERATIONS",
        header,
        vec![cells],
    )
}

/// Generation and verification cost of a single signature per scheme.
pub fn render_individual<W: Write>(out: &mut W, report: &CostReport) -> io::Result<()> {
    let header = vec![
        "Scheme".to_string(),
        "Single Signature Generation".to_string(),
        "Single Signature Verification".to_string(),
    ];
    let rows = report
        .schemes()
        .into_iter()
        .map(|scheme| {
            vec![
                scheme.to_string(),
                millis(report.get(scheme, Metric::Generation)),
                millis(report.get(scheme, Metric::Verification)),
            ]
        })
        .collect();

    table(
        out,
        "TABLE IV",
        "COMPARISON OF COMPUTATIONAL COSTS FOR INDIVIDUAL SIGNATURES",
        header,
        rows,
    )
}

/// Aggregate verification cost per scheme.
pub fn render_aggregate<W: Write>(out: &mut W, report: &CostReport) -> io::Result<()> {
    let header = vec![
        "Scheme".to_string(),
        format!(
            "Aggregate Signature Verification (n = {})",
            report.aggregation_size
        ),
    ];
    let rows = report
        .schemes()
        .into_iter()
        .map(|scheme| {
            vec![
                scheme.to_string(),
                millis(report.get(scheme, Metric::AggregateVerification)),
            ]
        })
        .collect();

    table(
        out,
        "TABLE V",
        "COMPARISON OF COMPUTATIONAL COSTS FOR AGGREGATE SIGNATURES",
        header,
        rows,
    )
}

pub fn render<W: Write>(out: &mut W, means: &MeanLatency, report: &CostReport) -> io::Result<()> {
    render_primitives(out, means)?;
    writeln!(out)?;
    render_individual(out, report)?;
    writeln!(out)?;
    render_aggregate(out, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::evaluate;

    fn means() -> MeanLatency {
        OperationKind::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| (*k, 0.25 * (i + 1) as f64))
            .collect()
    }

    fn rendered<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn primitives_table() {
        let means = means();
        let text = rendered(|out| render_primitives(out, &means));
        assert!(text.contains("TABLE II"));
        assert!(text.contains("| Notation |"));
        // Tpm is GroupScalarMultiply, the sixth kind
        assert!(text.contains("1.5000 ms"));

        // every row of the grid has the same width
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with('+') || l.starts_with('|'))
            .map(|l| l.len())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn missing_latency_is_a_dash() {
        let mut means = means();
        means.remove(OperationKind::Hash);
        let text = rendered(|out| render_primitives(out, &means));
        assert!(text.contains(" - "));
    }

    #[test]
    fn cost_tables_list_every_scheme() {
        let report = evaluate(&means(), 10).unwrap();
        let text = rendered(|out| render(out, &means(), &report));
        for scheme in report.schemes() {
            assert!(text.contains(&format!(" {} ", scheme)), "{}", scheme);
        }
        assert!(text.contains("TABLE IV"));
        assert!(text.contains("TABLE V"));
        assert!(text.contains("(n = 10)"));
    }
}
