use std::io::Write;

use descry_chart::{ChartOptions, svg};
use descry_stats::{quartiles::QuartileMethod, summary::SummaryStatistics};
use serde::Serialize;

use crate::{
    dataset::FERTILIZER_GRAMS,
    util::{self, ReportContext},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FertilizerArg {
    /// Quartile convention: MedianOfHalves or InterpolatedRank
    #[arg(long, default_value = "MedianOfHalves")]
    method: QuartileMethod,
}

#[derive(Debug, Serialize)]
struct FertilizerReport<'a> {
    dataset: &'static str,
    unit: &'static str,
    sorted: &'a [f64],
    #[serde(flatten)]
    stats: &'a SummaryStatistics,
}

pub(crate) fn run(
    arg: &FertilizerArg,
    ctx: &ReportContext,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let FertilizerArg { method } = arg;

    let mut sorted = FERTILIZER_GRAMS.to_vec();
    sorted.sort_by(f64::total_cmp);
    let stats = SummaryStatistics::from_sorted(&sorted, *method)?;
    tracing::debug!(count = stats.count, %method, "computed fertilizer statistics");

    if ctx.is_json() {
        ctx.write_json(
            out,
            &FertilizerReport {
                dataset: "fertilizer",
                unit: "grams",
                sorted: &sorted,
                stats: &stats,
            },
        )?;
    } else {
        write_text(out, &sorted, &stats)?;
    }

    ctx.save_chart(out, "fertilizer_boxplot.svg", || {
        svg::box_plot(
            &FERTILIZER_GRAMS,
            *method,
            &ChartOptions::new("Fertilizer Usage")
                .axes("", "Fertilizer (grams)")
                .size(400, 600),
        )
    })?;
    Ok(())
}

fn write_text(
    out: &mut dyn Write,
    sorted: &[f64],
    stats: &SummaryStatistics,
) -> anyhow::Result<()> {
    util::write_heading(out, "FERTILIZER USAGE (GRAMS)")?;
    writeln!(out, "Sorted data:")?;
    util::write_values(out, sorted)?;

    writeln!(out)?;
    writeln!(out, "--- Central Tendency ---")?;
    writeln!(out, "Mode: {}", util::describe_mode(&stats.mode))?;
    writeln!(out, "Mean: {:.4}", stats.mean)?;
    writeln!(out, "Median: {:.4}", stats.median)?;

    writeln!(out)?;
    writeln!(
        out,
        "--- Quartiles and IQR ({}) ---",
        stats.quartiles.method
    )?;
    writeln!(out, "Q1: {:.4}", stats.quartiles.q1)?;
    writeln!(out, "Q3: {:.4}", stats.quartiles.q3)?;
    writeln!(out, "IQR: {:.4}", stats.iqr)?;
    writeln!(out, "Range: {:.4}", stats.range)?;

    writeln!(out)?;
    writeln!(out, "Interpretation (box plot):")?;
    writeln!(out, "- Median = {:.4} marks the center.", stats.median)?;
    writeln!(
        out,
        "- IQR = {:.4} is the spread of the middle 50% of the data.",
        stats.iqr
    )?;
    writeln!(
        out,
        "- Values outside [Q1 - 1.5*IQR, Q3 + 1.5*IQR] are potential outliers."
    )?;
    writeln!(
        out,
        "- Lower fence = {:.4}, Upper fence = {:.4}",
        stats.fences.low, stats.fences.high
    )?;
    if stats.outliers.is_empty() {
        writeln!(out, "- No outliers detected by the 1.5*IQR rule.")?;
    } else {
        writeln!(out, "- Outliers: {}", util::join_values(&stats.outliers))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::{json_context, render, text_context};

    #[test]
    fn test_text_report() {
        let text = render(&text_context(), |ctx, out| {
            run(&FertilizerArg::default(), ctx, out)
        });
        assert!(text.contains("Mode: 64 (frequency 3)"));
        assert!(text.contains("Mean: 65.3478"));
        assert!(text.contains("Median: 65.0000"));
        assert!(text.contains("Q1: 61.0000"));
        assert!(text.contains("Q3: 72.0000"));
        assert!(text.contains("IQR: 11.0000"));
        assert!(text.contains("Range: 30.0000"));
        assert!(text.contains("Lower fence = 44.5000, Upper fence = 88.5000"));
        assert!(text.contains("No outliers"));
    }

    #[test]
    fn test_json_report() {
        let text = render(&json_context(), |ctx, out| {
            run(&FertilizerArg::default(), ctx, out)
        });
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["unit"], "grams");
        assert_eq!(json["count"], 23);
        assert_eq!(json["median"], 65.0);
        assert_eq!(json["quartiles"]["method"], "MedianOfHalves");
        assert_eq!(json["sorted"][0], 50.0);
        assert_eq!(json["outliers"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_interpolated_quartiles() {
        let arg = FertilizerArg {
            method: QuartileMethod::InterpolatedRank,
        };
        let text = render(&text_context(), |ctx, out| run(&arg, ctx, out));
        // rank 6 and 18 of 23 land exactly on observations
        assert!(text.contains("Q1: 61.0000"));
        assert!(text.contains("Q3: 72.0000"));
        assert!(text.contains("(InterpolatedRank)"));
    }
}
