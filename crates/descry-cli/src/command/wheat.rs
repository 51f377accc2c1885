use std::io::Write;

use descry_chart::{ChartOptions, svg};
use descry_stats::{
    binning::{self, ClassBinning},
    frequency::FrequencyTable,
    quartiles::{self, QuartileMethod},
    summary::SummaryStatistics,
};
use serde::Serialize;

use crate::{
    dataset::WHEAT_YIELD,
    util::{self, RULE, ReportContext},
};

/// Number of rows shown at each end of the squared-deviation table.
const DEVIATION_ROWS: usize = 5;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WheatArg {
    /// Number of class intervals in the grouped frequency table
    #[arg(long, default_value_t = 6)]
    classes: usize,
}

impl Default for WheatArg {
    fn default() -> Self {
        Self { classes: 6 }
    }
}

#[derive(Debug, Serialize)]
struct WheatReport<'a> {
    dataset: &'static str,
    unit: &'static str,
    values: &'a [f64],
    frequency: &'a FrequencyTable<f64>,
    suggested_classes: usize,
    classes: &'a ClassBinning,
    statistics: &'a SummaryStatistics,
}

pub(crate) fn run(arg: &WheatArg, ctx: &ReportContext, out: &mut dyn Write) -> anyhow::Result<()> {
    let WheatArg { classes } = arg;

    let frequency = FrequencyTable::from_samples(&WHEAT_YIELD);
    let binning = ClassBinning::new(&WHEAT_YIELD, *classes)?;
    let stats = SummaryStatistics::new(&WHEAT_YIELD, QuartileMethod::MedianOfHalves)?;
    let suggested_classes = binning::sqrt_rule_class_count(WHEAT_YIELD.len());
    tracing::debug!(
        classes,
        suggested_classes,
        width = binning.width(),
        "binned wheat yield"
    );

    if ctx.is_json() {
        ctx.write_json(
            out,
            &WheatReport {
                dataset: "wheat_yield",
                unit: "kg",
                values: &WHEAT_YIELD,
                frequency: &frequency,
                suggested_classes,
                classes: &binning,
                statistics: &stats,
            },
        )?;
    } else {
        write_frequency(out, &frequency, &binning, &stats, suggested_classes)?;
        writeln!(out)?;
        write_variability(out, &stats)?;
        writeln!(out)?;
        write_distribution(out, &stats, &binning)?;
    }

    ctx.save_chart(out, "wheat_yield_histogram.svg", || {
        svg::histogram(
            &binning,
            &ChartOptions::new("Wheat Yield Distribution")
                .axes("Grain Yield (kg)", "Frequency"),
        )
    })?;
    let bars = binning
        .intervals()
        .iter()
        .map(|interval| {
            (
                format!("{}-{}", interval.lower, interval.upper),
                interval.count as u64,
            )
        })
        .collect::<Vec<_>>();
    ctx.terminal_chart(out, "Grain yield classes", &bars)?;
    Ok(())
}

fn write_frequency(
    out: &mut dyn Write,
    frequency: &FrequencyTable<f64>,
    binning: &ClassBinning,
    stats: &SummaryStatistics,
    suggested_classes: usize,
) -> anyhow::Result<()> {
    util::write_heading(out, "Grain Yield Frequency")?;
    writeln!(out, "Original data (given order):")?;
    util::write_values(out, &WHEAT_YIELD)?;

    writeln!(out)?;
    writeln!(out, "Raw frequency (value : count):")?;
    for entry in frequency.entries() {
        writeln!(out, "{} : {}", entry.value, entry.count)?;
    }

    writeln!(out)?;
    writeln!(out, "| Grain Yield (kg) | Frequency |")?;
    writeln!(out, "| :--- | :---: |")?;
    for interval in binning.intervals() {
        writeln!(
            out,
            "| {} - {} | {} |",
            interval.lower, interval.upper, interval.count
        )?;
    }
    writeln!(out, "| **Total** | **{}** |", binning.total())?;

    let num_classes = binning.intervals().len();
    writeln!(out)?;
    writeln!(out, "Step-by-step summary:")?;
    writeln!(out, "1) Number of observations: {}", stats.count)?;
    writeln!(out, "2) Minimum value: {}", stats.min)?;
    writeln!(out, "3) Maximum value: {}", stats.max)?;
    writeln!(
        out,
        "4) Range = Max - Min = {} - {} = {}",
        stats.max, stats.min, stats.range
    )?;
    writeln!(
        out,
        "5) Suggested classes by sqrt rule ≈ {suggested_classes} (we use {num_classes})"
    )?;
    writeln!(
        out,
        "6) Class width (rounded up): ceil({} / {num_classes}) = {}",
        stats.range,
        binning.width()
    )?;
    writeln!(
        out,
        "7) Class intervals (inclusive) and frequencies printed above."
    )?;

    writeln!(out)?;
    if binning.is_consistent() {
        writeln!(
            out,
            "Sanity check: total frequency equals number of observations."
        )?;
    } else {
        writeln!(
            out,
            "Warning: total frequency ({}) != number of observations ({})",
            binning.total(),
            binning.sample_size()
        )?;
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn write_variability(out: &mut dyn Write, stats: &SummaryStatistics) -> anyhow::Result<()> {
    let mut sorted = WHEAT_YIELD.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let sum = sorted.iter().sum::<f64>();
    let mean = stats.mean;

    util::write_heading(out, "MEASURES OF VARIABILITY - Step by Step")?;
    writeln!(out)?;
    writeln!(out, "--- 1. RANGE ---")?;
    writeln!(out, "Step 1: Identify the minimum value = {} kg", stats.min)?;
    writeln!(out, "Step 2: Identify the maximum value = {} kg", stats.max)?;
    writeln!(
        out,
        "Step 3: Range = Max - Min = {} - {} = {} kg",
        stats.max, stats.min, stats.range
    )?;

    writeln!(out)?;
    writeln!(out, "--- 2. VARIANCE ---")?;
    writeln!(out, "Formula: σ² = Σ(xi - μ)² / n")?;
    writeln!(out, "Step 1: Calculate the mean (μ)")?;
    writeln!(out, "        Sum of all values = {sum}")?;
    writeln!(out, "        Mean (μ) = {sum} / {n} = {mean:.4} kg")?;
    writeln!(out, "Step 2: Calculate (xi - μ)² for each value:")?;
    writeln!(out, "        Value | (Value - Mean) | (Value - Mean)²")?;
    writeln!(out, "        ------|----------------|----------------")?;
    let mut sum_squared = 0.0;
    for (idx, value) in sorted.iter().enumerate() {
        let diff = value - mean;
        sum_squared += diff * diff;
        if idx < DEVIATION_ROWS || idx >= n.saturating_sub(DEVIATION_ROWS) {
            writeln!(out, "        {value:>5} | {diff:>14.4} | {:>15.4}", diff * diff)?;
        } else if idx == DEVIATION_ROWS {
            writeln!(out, "          ... |            ... |             ...")?;
        }
    }
    writeln!(out, "Step 3: Sum all squared differences")?;
    writeln!(out, "        Σ(xi - μ)² = {sum_squared:.4}")?;
    writeln!(out, "Step 4: Divide by n (population variance)")?;
    writeln!(
        out,
        "        Variance (σ²) = {sum_squared:.4} / {n} = {:.4} kg²",
        sum_squared / n as f64
    )?;

    writeln!(out)?;
    writeln!(out, "--- 3. STANDARD DEVIATION ---")?;
    writeln!(out, "Formula: σ = √(σ²)")?;
    writeln!(
        out,
        "        σ = √({:.4}) = {:.4} kg",
        stats.population_variance, stats.population_std_dev
    )?;
    writeln!(
        out,
        "Interpretation: On average, the wheat yield values deviate from the mean by \
         approximately {:.2} kg.",
        stats.population_std_dev
    )?;

    writeln!(out)?;
    writeln!(out, "--- 4. INTERQUARTILE RANGE (IQR) ---")?;
    let (lower, upper) = quartiles::halves(&sorted)?;
    writeln!(out, "Step 1: Arrange data in ascending order")?;
    util::write_values(out, &sorted)?;
    writeln!(out, "Step 2: Split data into two halves (n = {n})")?;
    writeln!(
        out,
        "        Lower half (first {} values): {}",
        lower.len(),
        util::join_values(lower)
    )?;
    writeln!(
        out,
        "        Upper half (last {} values): {}",
        upper.len(),
        util::join_values(upper)
    )?;
    for (step, name, half, value) in [
        (3, "Q1", lower, stats.quartiles.q1),
        (4, "Q3", upper, stats.quartiles.q3),
    ] {
        writeln!(out, "Step {step}: Calculate {name} (median of the half)")?;
        match util::middle_values(half) {
            [a, b] => {
                writeln!(out, "        Middle values: {a} and {b}")?;
                writeln!(out, "        {name} = ({a} + {b}) / 2 = {value:.2} kg")?;
            }
            _ => {
                writeln!(
                    out,
                    "        Middle value at position {}: {value}",
                    half.len() / 2 + 1
                )?;
                writeln!(out, "        {name} = {value:.2} kg")?;
            }
        }
    }
    writeln!(
        out,
        "Step 5: IQR = Q3 - Q1 = {:.2} - {:.2} = {:.2} kg",
        stats.quartiles.q3, stats.quartiles.q1, stats.iqr
    )?;

    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Range:                   {:.2} kg", stats.range)?;
    writeln!(
        out,
        "Variance (σ²):           {:.4} kg²",
        stats.population_variance
    )?;
    writeln!(
        out,
        "Standard Deviation (σ):  {:.4} kg",
        stats.population_std_dev
    )?;
    writeln!(out, "Q1 (First Quartile):     {:.2} kg", stats.quartiles.q1)?;
    writeln!(out, "Q3 (Third Quartile):     {:.2} kg", stats.quartiles.q3)?;
    writeln!(out, "IQR (Q3 - Q1):           {:.2} kg", stats.iqr)?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn write_distribution(
    out: &mut dyn Write,
    stats: &SummaryStatistics,
    binning: &ClassBinning,
) -> anyhow::Result<()> {
    writeln!(out, "--- Distribution Analysis ---")?;
    writeln!(out, "Number of observations: {}", stats.count)?;
    writeln!(out, "Mean: {:.2} kg", stats.mean)?;
    writeln!(out, "Median: {:.2} kg", stats.median)?;
    writeln!(out, "Standard Deviation: {:.2} kg", stats.population_std_dev)?;
    writeln!(out, "Skewness: {:.4}", stats.skewness)?;
    writeln!(out)?;
    writeln!(out, "--- Shape of the Distribution ---")?;
    util::write_shape(out, stats.shape)?;
    writeln!(out)?;
    writeln!(
        out,
        "The histogram spreads the data over {} classes of width {} from {} to {} kg.",
        binning.intervals().len(),
        binning.width(),
        stats.min,
        stats.max
    )?;
    Ok(())
}
