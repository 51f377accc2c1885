use std::io::Write;

use descry_chart::{ChartOptions, svg};
use descry_stats::{
    frequency::FrequencyTable, quartiles::QuartileMethod, summary::SummaryStatistics,
};
use serde::Serialize;

use crate::{
    dataset::WORK_HOURS,
    util::{self, RULE, ReportContext},
};

/// Number of employees shown at each end of the squared-deviation table.
const DEVIATION_ROWS: usize = 5;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WorkHoursArg {
    /// Also list every employee in the squared-deviation table
    #[arg(long)]
    full_table: bool,
}

/// How consistent the work hours are, judged from the standard deviation in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
enum VariabilityLevel {
    #[display("LOW")]
    Low,
    #[display("MODERATE")]
    Moderate,
    #[display("HIGH")]
    High,
}

impl VariabilityLevel {
    fn from_std_dev(std_dev: f64) -> Self {
        if std_dev < 2.0 {
            Self::Low
        } else if std_dev < 4.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    fn description(self) -> [&'static str; 2] {
        match self {
            Self::Low => [
                "Work hours are very consistent across employees.",
                "Most employees work very close to the average.",
            ],
            Self::Moderate => [
                "There is some variation in work hours.",
                "Most employees work within a reasonable range of the average.",
            ],
            Self::High => [
                "Work hours vary significantly across employees.",
                "Employees' work schedules differ substantially.",
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct WorkHoursReport<'a> {
    dataset: &'static str,
    unit: &'static str,
    values: &'a [f64],
    frequency: &'a FrequencyTable<f64>,
    statistics: &'a SummaryStatistics,
    variability: VariabilityLevel,
    within_one_std_dev: f64,
}

pub(crate) fn run(
    arg: &WorkHoursArg,
    ctx: &ReportContext,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let frequency = FrequencyTable::from_samples(&WORK_HOURS);
    let stats = SummaryStatistics::new(&WORK_HOURS, QuartileMethod::MedianOfHalves)?;
    let variability = VariabilityLevel::from_std_dev(stats.population_std_dev);
    let within_one_std_dev = stats.fraction_within_one_std_dev(&WORK_HOURS);
    tracing::debug!(%variability, within_one_std_dev, "analyzed work hours");

    if ctx.is_json() {
        ctx.write_json(
            out,
            &WorkHoursReport {
                dataset: "work_hours",
                unit: "hours",
                values: &WORK_HOURS,
                frequency: &frequency,
                statistics: &stats,
                variability,
                within_one_std_dev,
            },
        )?;
    } else {
        util::write_heading(out, "ANALYZING WEEKLY WORK HOURS")?;
        writeln!(out, "Original data (Employee ID 1-{}):", WORK_HOURS.len())?;
        util::write_values(out, &WORK_HOURS)?;
        writeln!(out)?;
        write_summary(out, &stats)?;
        writeln!(out)?;
        write_mean(out, &stats)?;
        writeln!(out)?;
        write_median(out, &stats)?;
        writeln!(out)?;
        write_mode(out, &frequency, &stats)?;
        writeln!(out)?;
        write_variability(out, arg, &stats, variability, within_one_std_dev)?;
    }

    ctx.save_chart(out, "work_hours_distribution_annotated.svg", || {
        svg::annotated_bar_chart(
            &frequency,
            &[
                svg::Marker {
                    label: "Mean",
                    value: stats.mean,
                },
                svg::Marker {
                    label: "Median",
                    value: stats.median,
                },
            ],
            &ChartOptions::new("Distribution of Weekly Work Hours")
                .axes("Work Hours", "Frequency (Number of Employees)")
                .size(800, 400),
        )
    })?;
    let bars = frequency
        .entries()
        .iter()
        .map(|entry| (format!("{} h", entry.value), entry.count as u64))
        .collect::<Vec<_>>();
    ctx.terminal_chart(out, "Employees per weekly hours", &bars)?;
    Ok(())
}

fn write_summary(out: &mut dyn Write, stats: &SummaryStatistics) -> anyhow::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:^59}", "SUMMARY")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Mean:               {:.2} hours", stats.mean)?;
    writeln!(out, "Median:             {:.1} hours", stats.median)?;
    writeln!(out, "Mode:               {}", util::describe_mode(&stats.mode))?;
    writeln!(
        out,
        "Variance:           {:.4} hours²",
        stats.population_variance
    )?;
    writeln!(
        out,
        "Standard Deviation: {:.4} hours",
        stats.population_std_dev
    )?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn write_mean(out: &mut dyn Write, stats: &SummaryStatistics) -> anyhow::Result<()> {
    let sum = WORK_HOURS.iter().sum::<f64>();
    util::write_heading(out, "1. MEAN (Average)")?;
    writeln!(
        out,
        "Formula: Mean = (Sum of all values) / (Number of values)"
    )?;
    writeln!(out, "Step 1: Add all the work hours together")?;
    for row in WORK_HOURS.chunks(10) {
        let terms = row.iter().map(ToString::to_string).collect::<Vec<_>>();
        writeln!(out, "        {}", terms.join(" + "))?;
    }
    writeln!(out, "        Sum = {sum} hours")?;
    writeln!(out, "Step 2: Divide the sum by the number of employees")?;
    writeln!(
        out,
        "        Mean = {sum} / {} = {:.4} hours",
        stats.count, stats.mean
    )?;
    writeln!(
        out,
        "Interpretation: On average, employees work {:.2} hours per week.",
        stats.mean
    )?;
    Ok(())
}

fn write_median(out: &mut dyn Write, stats: &SummaryStatistics) -> anyhow::Result<()> {
    let mut sorted = WORK_HOURS.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    util::write_heading(out, "2. MEDIAN (Middle Value)")?;
    writeln!(out, "Step 1: Arrange all values in ascending order")?;
    util::write_values(out, &sorted)?;
    match util::middle_values(&sorted) {
        [a, b] => {
            let (first, second) = (n / 2, n / 2 + 1);
            writeln!(
                out,
                "Step 2: n = {n} (even), so the middle positions are {first} and {second}"
            )?;
            writeln!(out, "        Value at position {first}: {a} hours")?;
            writeln!(out, "        Value at position {second}: {b} hours")?;
            writeln!(
                out,
                "        Median = ({a} + {b}) / 2 = {:.1} hours",
                stats.median
            )?;
        }
        _ => {
            writeln!(
                out,
                "Step 2: n = {n} (odd), so the middle position is {}",
                n / 2 + 1
            )?;
            writeln!(out, "        Median = {:.1} hours", stats.median)?;
        }
    }
    writeln!(
        out,
        "Interpretation: Half of the employees work at most {0:.1} hours, and half work at \
         least {0:.1} hours.",
        stats.median
    )?;
    Ok(())
}

fn write_mode(
    out: &mut dyn Write,
    frequency: &FrequencyTable<f64>,
    stats: &SummaryStatistics,
) -> anyhow::Result<()> {
    util::write_heading(out, "3. MODE (Most Frequent)")?;
    writeln!(out, "Step 1: Count how many times each value appears")?;
    writeln!(out, "        Work Hours | Frequency")?;
    writeln!(out, "        -----------|----------")?;
    for entry in frequency.entries() {
        writeln!(out, "        {:>10} | {}", entry.value, entry.count)?;
    }
    writeln!(out, "Step 2: Highest frequency = {}", frequency.max_frequency())?;
    let mode = &stats.mode;
    match mode.values.as_slice() {
        [] => {
            writeln!(
                out,
                "Step 3: Every value appears exactly once, so there is no mode."
            )?;
        }
        [value] => {
            writeln!(
                out,
                "Step 3: The value {value} appears {} times (most frequent)",
                mode.frequency
            )?;
            writeln!(
                out,
                "Interpretation: {value} hours is the most common weekly work time."
            )?;
        }
        values => {
            writeln!(
                out,
                "Step 3: Multiple values appear {} times (tied for most frequent): {}",
                mode.frequency,
                util::join_values(values)
            )?;
        }
    }
    writeln!(out, "Mode: {}", util::describe_mode(mode))?;
    Ok(())
}

fn write_variability(
    out: &mut dyn Write,
    arg: &WorkHoursArg,
    stats: &SummaryStatistics,
    variability: VariabilityLevel,
    within_one_std_dev: f64,
) -> anyhow::Result<()> {
    let n = WORK_HOURS.len();
    util::write_heading(out, "4. VARIANCE AND STANDARD DEVIATION (Variability)")?;
    writeln!(out, "--- VARIANCE (σ²) ---")?;
    writeln!(out, "Formula: σ² = Σ(xi - μ)² / n")?;
    writeln!(out, "Step 1: The mean (μ) = {:.4} hours", stats.mean)?;
    writeln!(out, "Step 2: Calculate (xi - μ)² for each employee's work hours:")?;
    writeln!(out, "        Employee | Hours | (Hours - Mean) | (Hours - Mean)²")?;
    writeln!(out, "        ---------|-------|----------------|----------------")?;
    let mut sum_squared = 0.0;
    for (idx, hours) in WORK_HOURS.iter().enumerate() {
        let diff = hours - stats.mean;
        sum_squared += diff * diff;
        if arg.full_table || idx < DEVIATION_ROWS || idx >= n.saturating_sub(DEVIATION_ROWS) {
            writeln!(
                out,
                "        {:>8} | {hours:>5} | {diff:>14.4} | {:>15.4}",
                idx + 1,
                diff * diff
            )?;
        } else if idx == DEVIATION_ROWS {
            writeln!(out, "             ... |   ... |            ... |             ...")?;
        }
    }
    writeln!(out, "Step 3: Σ(xi - μ)² = {sum_squared:.4}")?;
    writeln!(
        out,
        "Step 4: Variance (σ²) = {sum_squared:.4} / {n} = {:.4} hours²",
        stats.population_variance
    )?;

    writeln!(out)?;
    writeln!(out, "--- STANDARD DEVIATION (σ) ---")?;
    writeln!(
        out,
        "σ = √({:.4}) = {:.4} hours",
        stats.population_variance, stats.population_std_dev
    )?;

    writeln!(out)?;
    writeln!(out, "--- INTERPRETATION ---")?;
    writeln!(
        out,
        "On average, work hours deviate from the mean of {:.2} hours by about {:.2} hours.",
        stats.mean, stats.population_std_dev
    )?;
    let [first, second] = variability.description();
    writeln!(out, "  - {variability} variability: {first}")?;
    writeln!(out, "  - {second}")?;
    writeln!(
        out,
        "Between {:.2} and {:.2} hours (within 1 standard deviation of the mean) lie \
         {:.0}% of employees; about 68% is expected for normally distributed data.",
        stats.mean - stats.population_std_dev,
        stats.mean + stats.population_std_dev,
        within_one_std_dev * 100.0
    )?;
    Ok(())
}
