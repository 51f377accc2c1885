use std::io::Write;

use descry_chart::{ChartOptions, svg};
use descry_stats::{
    binning::{self, BoundaryPolicy, ClassBinning},
    dispersion::SpreadMeasure,
    quartiles::QuartileMethod,
    summary::SummaryStatistics,
};
use serde::Serialize;

use crate::{
    dataset::STUDENT_MARKS,
    util::{self, ReportContext},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MarksArg {
    /// Quartile convention: MedianOfHalves or InterpolatedRank
    #[arg(long, default_value = "InterpolatedRank")]
    method: QuartileMethod,
}

impl Default for MarksArg {
    fn default() -> Self {
        Self {
            method: QuartileMethod::InterpolatedRank,
        }
    }
}

#[derive(Debug, Serialize)]
struct MarksReport<'a> {
    dataset: &'static str,
    sorted: &'a [f64],
    classes: &'a ClassBinning,
    statistics: &'a SummaryStatistics,
    recommended_spread: SpreadMeasure,
}

pub(crate) fn run(arg: &MarksArg, ctx: &ReportContext, out: &mut dyn Write) -> anyhow::Result<()> {
    let MarksArg { method } = arg;

    let mut sorted = STUDENT_MARKS.to_vec();
    sorted.sort_by(f64::total_cmp);
    let num_classes = binning::sqrt_rule_class_count(sorted.len());
    let binning = ClassBinning::with_policy(&sorted, num_classes, BoundaryPolicy::HalfOpen)?;
    let stats = SummaryStatistics::from_sorted(&sorted, *method)?;
    let recommended_spread = stats.shape.preferred_spread();
    tracing::debug!(
        num_classes,
        skewness = stats.skewness,
        %recommended_spread,
        "analyzed student marks"
    );

    if ctx.is_json() {
        ctx.write_json(
            out,
            &MarksReport {
                dataset: "student_marks",
                sorted: &sorted,
                classes: &binning,
                statistics: &stats,
                recommended_spread,
            },
        )?;
    } else {
        write_text(out, &sorted, &binning, &stats)?;
    }

    ctx.save_chart(out, "marks_histogram.svg", || {
        svg::histogram(
            &binning,
            &ChartOptions::new("Histogram of Student Marks").axes("Marks", "Frequency"),
        )
    })?;
    let bars = binning
        .intervals()
        .iter()
        .map(|interval| (interval.to_string(), interval.count as u64))
        .collect::<Vec<_>>();
    ctx.terminal_chart(out, "Student marks", &bars)?;
    Ok(())
}

fn write_text(
    out: &mut dyn Write,
    sorted: &[f64],
    binning: &ClassBinning,
    stats: &SummaryStatistics,
) -> anyhow::Result<()> {
    util::write_heading(out, "Student Marks")?;
    writeln!(out, "Sorted marks ({} values):", sorted.len())?;
    util::write_values(out, sorted)?;

    writeln!(out)?;
    writeln!(
        out,
        "Number of classes (sqrt(n) rounded): {}",
        binning.intervals().len()
    )?;
    writeln!(
        out,
        "Range = {} - {} = {}",
        stats.max, stats.min, stats.range
    )?;
    writeln!(out, "Class width (rounded up) = {}", binning.width())?;

    writeln!(out)?;
    writeln!(out, "Frequency table:")?;
    writeln!(out, "{:<16}Frequency", "Class interval")?;
    for interval in binning.intervals() {
        writeln!(out, "{:<16}{}", interval.to_string(), interval.count)?;
    }
    writeln!(out, "{:<16}{}", "Total", binning.total())?;

    writeln!(out)?;
    writeln!(out, "Central tendency:")?;
    writeln!(out, "Mode: {}", util::describe_mode(&stats.mode))?;
    writeln!(out, "Mean: {:.4}", stats.mean)?;
    writeln!(out, "Median: {:.4}", stats.median)?;

    writeln!(out)?;
    writeln!(out, "Measures of variability:")?;
    writeln!(out, "Range: {:.4}", stats.range)?;
    writeln!(out, "Population Variance: {:.4}", stats.population_variance)?;
    if let Some(variance) = stats.sample_variance {
        writeln!(out, "Sample Variance: {variance:.4}")?;
    }
    writeln!(out, "Population Std Dev: {:.4}", stats.population_std_dev)?;
    if let Some(std_dev) = stats.sample_std_dev {
        writeln!(out, "Sample Std Dev: {std_dev:.4}")?;
    }
    writeln!(out, "Q1: {:.4}", stats.quartiles.q1)?;
    writeln!(out, "Q3: {:.4}", stats.quartiles.q3)?;
    writeln!(out, "IQR: {:.4}", stats.iqr)?;

    writeln!(out)?;
    writeln!(out, "Skewness: {:.4}", stats.skewness)?;
    match stats.shape.preferred_spread() {
        SpreadMeasure::StdDev => writeln!(
            out,
            "Distribution roughly symmetric -> the sample standard deviation is a suitable \
             measure of variability."
        )?,
        SpreadMeasure::Iqr => writeln!(
            out,
            "Distribution skewed -> the IQR is a more robust measure of variability."
        )?,
    }
    writeln!(out, "Histogram shape: {}.", stats.shape)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::{json_context, render, text_context};

    fn report() -> String {
        render(&text_context(), |ctx, out| {
            run(&MarksArg::default(), ctx, out)
        })
    }

    #[test]
    fn test_class_table() {
        let text = report();
        assert!(text.contains("Number of classes (sqrt(n) rounded): 5"));
        assert!(text.contains("Range = 47 - 8 = 39"));
        assert!(text.contains("Class width (rounded up) = 8"));
        for (interval, count) in [
            ("[8, 16)", 6),
            ("[16, 24)", 5),
            ("[24, 32)", 8),
            ("[32, 40)", 3),
            ("[40, 47]", 3),
            ("Total", 25),
        ] {
            let row = format!("{interval:<16}{count}");
            assert!(text.contains(&row), "missing {row}");
        }
    }

    #[test]
    fn test_measures() {
        let text = report();
        assert!(text.contains("Mode: 28 (frequency 3)"));
        assert!(text.contains("Mean: 24.4400"));
        assert!(text.contains("Median: 25.0000"));
        assert!(text.contains("Population Variance: 117.1264"));
        assert!(text.contains("Sample Variance: 122.0067"));
        assert!(text.contains("Population Std Dev: 10.8225"));
        assert!(text.contains("Sample Std Dev: 11.0457"));
        assert!(text.contains("Q1: 15.5000"));
        assert!(text.contains("Q3: 31.5000"));
        assert!(text.contains("IQR: 16.0000"));
        assert!(text.contains("Skewness: 0.1600"));
        assert!(text.contains("sample standard deviation is a suitable"));
        assert!(text.contains("Histogram shape: approximately symmetric."));
    }

    #[test]
    fn test_json_report() {
        let text = render(&json_context(), |ctx, out| {
            run(&MarksArg::default(), ctx, out)
        });
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["recommended_spread"], "StdDev");
        assert_eq!(json["statistics"]["quartiles"]["method"], "InterpolatedRank");
        assert_eq!(json["statistics"]["quartiles"]["q1"], 15.5);
        assert_eq!(json["classes"]["policy"], "HalfOpen");
    }
}
