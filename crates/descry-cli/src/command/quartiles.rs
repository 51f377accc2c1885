use std::io::Write;

use descry_chart::{ChartOptions, svg};
use descry_stats::{
    quartiles::{self, QuartileMethod},
    summary::SummaryStatistics,
};
use serde::Serialize;

use crate::{
    dataset::FERTILIZER_KG,
    util::{self, ReportContext},
};

#[derive(Debug, Serialize)]
struct QuartileDemo<'a> {
    dataset: &'static str,
    unit: &'static str,
    sorted: &'a [f64],
    lower_half: &'a [f64],
    upper_half: &'a [f64],
    q1: f64,
    median: f64,
    q3: f64,
    iqr: f64,
}

pub(crate) fn run(ctx: &ReportContext, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut sorted = FERTILIZER_KG.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (lower, upper) = quartiles::halves(&sorted)?;
    let stats = SummaryStatistics::from_sorted(&sorted, QuartileMethod::MedianOfHalves)?;
    tracing::debug!(
        lower = lower.len(),
        upper = upper.len(),
        "split fertilizer sample into halves"
    );

    if ctx.is_json() {
        ctx.write_json(
            out,
            &QuartileDemo {
                dataset: "fertilizer",
                unit: "kg",
                sorted: &sorted,
                lower_half: lower,
                upper_half: upper,
                q1: stats.quartiles.q1,
                median: stats.median,
                q3: stats.quartiles.q3,
                iqr: stats.iqr,
            },
        )?;
    } else {
        util::write_heading(out, "Visual Demonstration for Quartiles")?;
        writeln!(out)?;
        writeln!(out, "Step 1: The full dataset sorted from smallest to largest:")?;
        util::write_values(out, &sorted)?;

        writeln!(out)?;
        writeln!(out, "Step 2: The data is split into two halves.")?;
        if sorted.len() % 2 == 1 {
            writeln!(
                out,
                "The median {} belongs to neither half.",
                stats.median
            )?;
        }
        writeln!(out, "Lower half (first {} values):", lower.len())?;
        util::write_values(out, lower)?;
        writeln!(out)?;
        writeln!(out, "Upper half (last {} values):", upper.len())?;
        util::write_values(out, upper)?;

        for (step, name, half, value) in [
            (3, "Q1", lower, stats.quartiles.q1),
            (4, "Q3", upper, stats.quartiles.q3),
        ] {
            let side = if name == "Q1" { "lower" } else { "upper" };
            writeln!(out)?;
            writeln!(out, "Step {step}: Calculate {name} from the {side} half.")?;
            match util::middle_values(half) {
                [a, b] => {
                    writeln!(out, "The middle values of the {side} half are {a:.1} and {b:.1}.")?;
                    writeln!(out, "{name} = ({a:.1} + {b:.1}) / 2 = {value:.2} kg")?;
                }
                _ => {
                    writeln!(out, "The middle value of the {side} half is {value:.1}.")?;
                    writeln!(out, "{name} = {value:.2} kg")?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "--- FINAL RESULTS ---")?;
        writeln!(out, "First Quartile (Q1): {:.2} kg", stats.quartiles.q1)?;
        writeln!(out, "Median (Q2): {:.2} kg", stats.median)?;
        writeln!(out, "Third Quartile (Q3): {:.2} kg", stats.quartiles.q3)?;
        writeln!(out, "Interquartile Range (IQR): {:.2} kg", stats.iqr)?;
    }

    ctx.save_chart(out, "fertilizer_kg_boxplot.svg", || {
        svg::box_plot(
            &FERTILIZER_KG,
            QuartileMethod::MedianOfHalves,
            &ChartOptions::new("Fertilizer Usage per Field")
                .axes("", "Fertilizer (kg)")
                .size(400, 600),
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::{json_context, render, text_context};

    #[test]
    fn test_text_walkthrough() {
        let text = render(&text_context(), run);
        assert!(text.contains("Lower half (first 30 values):"));
        assert!(text.contains("Upper half (last 30 values):"));
        assert!(text.contains("Q1 = (22.5 + 22.6) / 2 = 22.55 kg"));
        assert!(text.contains("Q3 = (24.4 + 24.5) / 2 = 24.45 kg"));
        assert!(text.contains("Median (Q2): 23.50 kg"));
        assert!(text.contains("Interquartile Range (IQR): 1.90 kg"));
    }

    #[test]
    fn test_json_halves() {
        let text = render(&json_context(), run);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["lower_half"].as_array().unwrap().len(), 30);
        assert_eq!(json["upper_half"].as_array().unwrap().len(), 30);
        assert_eq!(json["lower_half"][0], 20.0);
        assert_eq!(json["upper_half"][29], 25.5);
        assert!((json["q1"].as_f64().unwrap() - 22.55).abs() < 1e-9);
    }
}
