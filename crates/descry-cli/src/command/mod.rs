use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::util::{Output, OutputFormat, ReportContext};

use self::{
    apples::ApplesArg, fertilizer::FertilizerArg, marks::MarksArg, wheat::WheatArg,
    work_hours::WorkHoursArg,
};

mod apples;
mod fertilizer;
mod marks;
mod quartiles;
mod wheat;
mod work_hours;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArgs,
    /// Which analysis to run (all of them when omitted)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, clap::Args)]
struct GlobalArgs {
    /// Report format: text or json
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
    /// Directory where SVG charts are written
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,
    /// Do not write chart files
    #[arg(long, global = true)]
    no_charts: bool,
    /// Also draw the main bar chart in the terminal
    #[arg(long, global = true)]
    terminal_chart: bool,
    /// Write the report to a file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Central tendency, quartiles and outliers of fertilizer usage (grams)
    Fertilizer(#[clap(flatten)] FertilizerArg),
    /// Step-by-step quartile demonstration on fertilizer usage (kilograms)
    Quartiles,
    /// Frequency tables and variability of wheat yield
    Wheat(#[clap(flatten)] WheatArg),
    /// Class table, variability and shape of student marks
    Marks(#[clap(flatten)] MarksArg),
    /// Central tendency and spread of weekly work hours
    WorkHours(#[clap(flatten)] WorkHoursArg),
    /// Qualitative and bivariate analysis of apple quality records
    Apples(#[clap(flatten)] ApplesArg),
    /// Run every analysis in turn
    All,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    setup_logging(args.global.verbose)?;

    let ctx = ReportContext {
        format: args.global.format,
        chart_dir: (!args.global.no_charts).then(|| args.global.out_dir.clone()),
        terminal_chart: args.global.terminal_chart,
    };
    let mut output = Output::new(args.global.output.clone())?;
    dispatch(args.mode.unwrap_or(Mode::All), &ctx, &mut output)?;
    output.finish()
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn dispatch(mode: Mode, ctx: &ReportContext, out: &mut dyn io::Write) -> anyhow::Result<()> {
    match mode {
        Mode::Fertilizer(arg) => fertilizer::run(&arg, ctx, out)?,
        Mode::Quartiles => quartiles::run(ctx, out)?,
        Mode::Wheat(arg) => wheat::run(&arg, ctx, out)?,
        Mode::Marks(arg) => marks::run(&arg, ctx, out)?,
        Mode::WorkHours(arg) => work_hours::run(&arg, ctx, out)?,
        Mode::Apples(arg) => apples::run(&arg, ctx, out)?,
        Mode::All => run_all(ctx, out)?,
    }
    Ok(())
}

fn run_all(ctx: &ReportContext, out: &mut dyn io::Write) -> anyhow::Result<()> {
    let modes = [
        Mode::Fertilizer(FertilizerArg::default()),
        Mode::Quartiles,
        Mode::Wheat(WheatArg::default()),
        Mode::Marks(MarksArg::default()),
        Mode::WorkHours(WorkHoursArg::default()),
        Mode::Apples(ApplesArg::default()),
    ];
    for (idx, mode) in modes.into_iter().enumerate() {
        tracing::debug!(?mode, "running analysis");
        if idx > 0 && !ctx.is_json() {
            writeln!(out)?;
        }
        dispatch(mode, ctx, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;
    use crate::util::tests::{json_context, render, text_context};

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = CommandArgs::try_parse_from([
            "descry",
            "work-hours",
            "--format",
            "json",
            "--no-charts",
        ])
        .unwrap();
        assert_eq!(args.global.format, OutputFormat::Json);
        assert!(args.global.no_charts);
        assert!(matches!(args.mode, Some(Mode::WorkHours(_))));
    }

    #[test]
    fn test_parse_quartile_method() {
        let args =
            CommandArgs::try_parse_from(["descry", "fertilizer", "--method", "InterpolatedRank"])
                .unwrap();
        assert!(matches!(args.mode, Some(Mode::Fertilizer(_))));
        assert!(CommandArgs::try_parse_from(["descry", "fertilizer", "--method", "nope"]).is_err());
    }

    #[test]
    fn test_run_all_text() {
        let text = render(&text_context(), run_all);
        for heading in [
            "Central Tendency",
            "Visual Demonstration for Quartiles",
            "Grain Yield",
            "Student Marks",
            "WEEKLY WORK HOURS",
            "Qualitative variables",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn test_run_all_json_is_a_stream_of_documents() {
        let text = render(&json_context(), run_all);
        let docs = serde_json::Deserializer::from_str(&text)
            .into_iter::<serde_json::Value>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(docs.len(), 6);
    }
}
