use std::io::Write;

use anyhow::ensure;
use descry_chart::{ChartOptions, svg};
use descry_stats::{
    bivariate::{self, LinearRegression},
    contingency::{self, Bucket, ContingencyTable},
    frequency::FrequencyTable,
};
use serde::Serialize;

use crate::{
    dataset::{APPLES, AppleRecord, Crunchiness, Quality},
    util::{self, ReportContext},
};

/// Absolute correlation below which the linear association is called weak.
const WEAK_CORRELATION: f64 = 0.3;
/// Absolute correlation from which the linear association is called strong.
const STRONG_CORRELATION: f64 = 0.7;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ApplesArg {
    /// Sweetness bucket edges for the quality composition, in ascending order
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 2.0, 3.0])]
    sweetness_edges: Vec<f64>,
}

impl Default for ApplesArg {
    fn default() -> Self {
        Self {
            sweetness_edges: vec![1.0, 2.0, 3.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
enum CorrelationStrength {
    #[display("weak")]
    Weak,
    #[display("moderate")]
    Moderate,
    #[display("strong")]
    Strong,
}

impl CorrelationStrength {
    fn classify(r: f64) -> Self {
        let r = r.abs();
        if r < WEAK_CORRELATION {
            Self::Weak
        } else if r < STRONG_CORRELATION {
            Self::Moderate
        } else {
            Self::Strong
        }
    }
}

#[derive(Debug, Serialize)]
struct ApplesReport<'a> {
    dataset: &'static str,
    records: &'a [AppleRecord],
    crunchiness: &'a FrequencyTable<Crunchiness>,
    quality: &'a FrequencyTable<Quality>,
    ripeness: &'a FrequencyTable<u8>,
    pearson_r: f64,
    correlation_strength: CorrelationStrength,
    regression: LinearRegression,
    sweetness_by_quality: &'a ContingencyTable<Quality>,
}

/// Builds `<=e0`, `e0-e1`, ..., `>en` buckets from ascending edges.
fn sweetness_buckets(edges: &[f64]) -> anyhow::Result<Vec<Bucket>> {
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        anyhow::bail!("at least one sweetness edge is required");
    };
    ensure!(
        edges.is_sorted_by(|a, b| a < b),
        "sweetness edges must be strictly ascending: {edges:?}"
    );

    let mut buckets = vec![Bucket::at_most(format!("<={first}"), *first)];
    buckets.extend(
        edges
            .windows(2)
            .map(|pair| Bucket::new(format!("{}-{}", pair[0], pair[1]), pair[0], pair[1])),
    );
    buckets.push(Bucket::above(format!(">{last}"), *last));
    Ok(buckets)
}

pub(crate) fn run(arg: &ApplesArg, ctx: &ReportContext, out: &mut dyn Write) -> anyhow::Result<()> {
    let buckets = sweetness_buckets(&arg.sweetness_edges)?;

    let crunchiness = FrequencyTable::new(APPLES.iter().map(|apple| apple.crunchiness));
    let quality = FrequencyTable::new(APPLES.iter().map(|apple| apple.quality));
    let ripeness = FrequencyTable::new(APPLES.iter().map(|apple| apple.ripeness));

    let weights = APPLES.iter().map(|apple| apple.weight).collect::<Vec<_>>();
    let sweetness = APPLES.iter().map(|apple| apple.sweetness).collect::<Vec<_>>();
    let pearson_r = bivariate::pearson_correlation(&weights, &sweetness)?;
    let regression = bivariate::linear_regression(&weights, &sweetness)?;
    let strength = CorrelationStrength::classify(pearson_r);
    let composition = contingency::binned_contingency(
        &APPLES,
        &buckets,
        |apple| apple.sweetness,
        |apple| apple.quality,
    );
    tracing::debug!(pearson_r, %strength, "analyzed apple records");

    if ctx.is_json() {
        ctx.write_json(
            out,
            &ApplesReport {
                dataset: "apples",
                records: &APPLES,
                crunchiness: &crunchiness,
                quality: &quality,
                ripeness: &ripeness,
                pearson_r,
                correlation_strength: strength,
                regression,
                sweetness_by_quality: &composition,
            },
        )?;
    } else {
        util::write_heading(out, "APPLE QUALITY")?;
        writeln!(out, "--- Qualitative variables ---")?;
        writeln!(out, "1) Crunchiness (high / medium / low):")?;
        write_counts(out, &crunchiness)?;
        writeln!(out, "2) Quality (good / bad):")?;
        write_counts(out, &quality)?;
        let good_share = quality
            .relative_frequencies()
            .find(|(key, _)| **key == Quality::Good)
            .map_or(0.0, |(_, share)| share);
        if good_share > 0.5 {
            writeln!(
                out,
                "   The majority ({:.0}%) are labeled good; quality appears generally positive.",
                good_share * 100.0
            )?;
        } else {
            writeln!(
                out,
                "   Only {:.0}% are labeled good; quality appears to be a concern.",
                good_share * 100.0
            )?;
        }
        writeln!(out, "3) Ripeness (1 = unripe to 4 = very ripe):")?;
        write_counts(out, &ripeness)?;

        writeln!(out)?;
        writeln!(out, "--- Weight vs Sweetness ---")?;
        writeln!(out, "Pearson correlation r = {pearson_r:.4} ({strength})")?;
        if strength == CorrelationStrength::Weak {
            writeln!(
                out,
                "   There is little to no linear relationship between weight and sweetness."
            )?;
        } else if pearson_r > 0.0 {
            writeln!(out, "   Positive correlation: heavier apples tend to be sweeter.")?;
        } else {
            writeln!(
                out,
                "   Negative correlation: heavier apples tend to be less sweet."
            )?;
        }
        let sign = if regression.intercept < 0.0 { '-' } else { '+' };
        writeln!(
            out,
            "Regression line: sweetness = {:.4} * weight {sign} {:.4}",
            regression.slope,
            regression.intercept.abs()
        )?;

        writeln!(out)?;
        writeln!(out, "--- Sweetness bucket vs Quality (counts) ---")?;
        for (idx, bucket) in composition.buckets().iter().enumerate() {
            writeln!(
                out,
                "{}: good={}, bad={}",
                bucket.label,
                composition.count(idx, &Quality::Good),
                composition.count(idx, &Quality::Bad)
            )?;
        }
        if composition.unmatched() > 0 {
            writeln!(
                out,
                "{} records fell outside every bucket",
                composition.unmatched()
            )?;
        }
    }

    save_charts(ctx, out, &crunchiness, &quality, &ripeness, &regression, &composition)?;
    let bars = ripeness
        .entries()
        .iter()
        .map(|entry| (format!("ripeness {}", entry.value), entry.count as u64))
        .collect::<Vec<_>>();
    ctx.terminal_chart(out, "Ripeness", &bars)?;
    Ok(())
}

fn write_counts<K>(out: &mut dyn Write, table: &FrequencyTable<K>) -> anyhow::Result<()>
where
    K: std::fmt::Display,
{
    for entry in table.entries() {
        writeln!(out, "   - {}: {} observations", entry.value, entry.count)?;
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn category_bars<K>(table: &FrequencyTable<K>) -> Vec<(String, f64)>
where
    K: std::fmt::Display,
{
    table
        .entries()
        .iter()
        .map(|entry| (entry.value.to_string(), entry.count as f64))
        .collect()
}

fn save_charts(
    ctx: &ReportContext,
    out: &mut dyn Write,
    crunchiness: &FrequencyTable<Crunchiness>,
    quality: &FrequencyTable<Quality>,
    ripeness: &FrequencyTable<u8>,
    regression: &LinearRegression,
    composition: &ContingencyTable<Quality>,
) -> anyhow::Result<()> {
    ctx.save_chart(out, "crunchiness_distribution.svg", || {
        svg::bar_chart(
            &category_bars(crunchiness),
            &ChartOptions::new("Crunchiness").axes("Crunchiness", "Count"),
        )
    })?;
    ctx.save_chart(out, "quality_distribution.svg", || {
        svg::bar_chart(
            &category_bars(quality),
            &ChartOptions::new("Quality").axes("Quality", "Count"),
        )
    })?;
    ctx.save_chart(out, "ripeness_distribution.svg", || {
        svg::bar_chart(
            &category_bars(ripeness),
            &ChartOptions::new("Ripeness").axes("Ripeness (1 = low, 4 = high)", "Count"),
        )
    })?;

    let points_of = |quality: Quality| {
        APPLES
            .iter()
            .filter(|apple| apple.quality == quality)
            .map(|apple| (apple.weight, apple.sweetness))
            .collect::<Vec<_>>()
    };
    let good = points_of(Quality::Good);
    let bad = points_of(Quality::Bad);
    ctx.save_chart(out, "weight_vs_sweetness.svg", || {
        svg::scatter_with_regression(
            &[
                svg::ScatterGroup {
                    label: "good",
                    points: &good,
                },
                svg::ScatterGroup {
                    label: "bad",
                    points: &bad,
                },
            ],
            regression,
            &ChartOptions::new("Weight vs Sweetness (colored by Quality)")
                .axes("Weight (g)", "Sweetness")
                .size(600, 400),
        )
    })?;
    ctx.save_chart(out, "sweetness_quality_composition.svg", || {
        svg::grouped_bar_chart(
            composition,
            &ChartOptions::new("Composition: Sweetness buckets vs Quality")
                .axes("Sweetness bucket", "Count")
                .size(600, 300),
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::{json_context, render, text_context};

    fn report() -> String {
        render(&text_context(), |ctx, out| {
            run(&ApplesArg::default(), ctx, out)
        })
    }

    #[test]
    fn test_sweetness_buckets() {
        let buckets = sweetness_buckets(&[1.0, 2.0, 3.0]).unwrap();
        let labels = buckets.iter().map(|b| b.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["<=1", "1-2", "2-3", ">3"]);
        assert!(buckets[0].contains(1.0));
        assert!(buckets[1].contains(2.0));
        assert!(!buckets[1].contains(1.0));
        assert!(buckets[3].contains(10.0));

        assert!(sweetness_buckets(&[]).is_err());
        assert!(sweetness_buckets(&[2.0, 1.0]).is_err());
        assert!(sweetness_buckets(&[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_correlation_strength() {
        assert_eq!(CorrelationStrength::classify(0.1), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::classify(-0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::classify(0.9), CorrelationStrength::Strong);
    }

    #[test]
    fn test_qualitative_counts() {
        let text = report();
        for line in [
            "   - high: 9 observations",
            "   - medium: 5 observations",
            "   - low: 6 observations",
            "   - good: 13 observations",
            "   - bad: 7 observations",
            "   - 1: 4 observations",
            "   - 2: 7 observations",
            "   - 3: 6 observations",
            "   - 4: 3 observations",
        ] {
            assert!(text.contains(line), "missing {line}");
        }
        assert!(text.contains("The majority (65%) are labeled good"));
    }

    #[test]
    fn test_bivariate() {
        let text = report();
        assert!(text.contains("Pearson correlation r = 0.5303 (moderate)"));
        assert!(text.contains("heavier apples tend to be sweeter"));
        assert!(text.contains("Regression line: sweetness = 0.0682 * weight - 3.9492"));
        for line in [
            "<=1: good=4, bad=3",
            "1-2: good=4, bad=2",
            "2-3: good=3, bad=2",
            ">3: good=2, bad=0",
        ] {
            assert!(text.contains(line), "missing {line}");
        }
    }

    #[test]
    fn test_custom_edges() {
        let arg = ApplesArg {
            sweetness_edges: vec![2.0],
        };
        let text = render(&text_context(), |ctx, out| run(&arg, ctx, out));
        assert!(text.contains("<=2: good=8, bad=5"));
        assert!(text.contains(">2: good=5, bad=2"));
    }

    #[test]
    fn test_json_report() {
        let text = render(&json_context(), |ctx, out| {
            run(&ApplesArg::default(), ctx, out)
        });
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["records"].as_array().unwrap().len(), 20);
        assert_eq!(json["records"][0]["crunchiness"], "high");
        assert_eq!(json["correlation_strength"], "Moderate");
        assert_eq!(json["sweetness_by_quality"]["groups"][0], "good");
        assert_eq!(json["sweetness_by_quality"]["unmatched"], 0);
    }
}
