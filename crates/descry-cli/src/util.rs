use std::{
    fmt,
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write},
    path::PathBuf,
};

use anyhow::Context;
use descry_chart::{ChartError, text};
use descry_stats::{dispersion::Shape, frequency::Mode};

/// Width of charts drawn into the terminal, in columns.
const TERMINAL_CHART_WIDTH: u16 = 72;

/// Horizontal rule framing report sections.
pub(crate) const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Destination of the report stream: stdout, or the file given by `--output`.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub(crate) fn new(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Flushes buffered reports, naming the destination if that fails.
    pub(crate) fn finish(mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush reports to {self}"))?;
        if let Self::File { path, .. } = &self {
            tracing::info!(path = %path.display(), "wrote reports");
        }
        Ok(())
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(_) => f.write_str("stdout"),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer().flush()
    }
}

/// How reports are printed.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    /// Step-by-step narrative.
    #[default]
    Text,
    /// The computed values as pretty-printed JSON.
    Json,
}

/// Settings shared by every report command.
#[derive(Debug, Clone)]
pub(crate) struct ReportContext {
    pub(crate) format: OutputFormat,
    /// Directory for SVG charts; `None` disables chart files.
    pub(crate) chart_dir: Option<PathBuf>,
    pub(crate) terminal_chart: bool,
}

impl ReportContext {
    pub(crate) fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes one report as a pretty-printed JSON document followed by a newline,
    /// so that `all` produces a stream of documents.
    pub(crate) fn write_json<T>(&self, out: &mut dyn Write, report: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        debug_assert!(self.is_json());
        serde_json::to_writer_pretty(&mut *out, report).context("Failed to write JSON report")?;
        writeln!(out).context("Failed to write newline after JSON report")?;
        Ok(())
    }

    /// Renders a chart and writes it to `file_name` in the chart directory.
    ///
    /// Does nothing when charts are disabled. In text mode the saved path is
    /// reported to `out`.
    pub(crate) fn save_chart<F>(
        &self,
        out: &mut dyn Write,
        file_name: &str,
        render: F,
    ) -> anyhow::Result<()>
    where
        F: FnOnce() -> Result<String, ChartError>,
    {
        let Some(dir) = &self.chart_dir else {
            tracing::debug!(file_name, "chart output disabled");
            return Ok(());
        };
        let svg = render().with_context(|| format!("Failed to render chart {file_name}"))?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create chart directory: {}", dir.display()))?;
        let path = dir.join(file_name);
        fs::write(&path, svg)
            .with_context(|| format!("Failed to write chart: {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved chart");

        if !self.is_json() {
            writeln!(out, "Saved {}", path.display())?;
        }
        Ok(())
    }

    /// Draws a horizontal bar chart into `out` when terminal charts are enabled.
    pub(crate) fn terminal_chart(
        &self,
        out: &mut dyn Write,
        title: &str,
        bars: &[(String, u64)],
    ) -> anyhow::Result<()> {
        if !self.terminal_chart || self.is_json() {
            return Ok(());
        }
        writeln!(out)?;
        for line in text::bar_chart_lines(title, bars, TERMINAL_CHART_WIDTH) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Writes a section title framed by horizontal rules.
pub(crate) fn write_heading(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{title:^59}")?;
    writeln!(out, "{RULE}")
}

/// Formats values as a comma-separated list.
pub(crate) fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes values ten per line.
pub(crate) fn write_values(out: &mut dyn Write, values: &[f64]) -> io::Result<()> {
    for row in values.chunks(10) {
        writeln!(out, "{}", join_values(row))?;
    }
    Ok(())
}

/// Describes a mode the way every report prints it.
pub(crate) fn describe_mode(mode: &Mode<f64>) -> String {
    if mode.is_empty() {
        "None (all values unique)".to_string()
    } else {
        format!("{} (frequency {})", join_values(&mode.values), mode.frequency)
    }
}

/// Returns the one or two central elements the median of sorted `values` is taken from.
pub(crate) fn middle_values(values: &[f64]) -> &[f64] {
    let n = values.len();
    if n == 0 {
        values
    } else if n % 2 == 0 {
        &values[n / 2 - 1..=n / 2]
    } else {
        &values[n / 2..=n / 2]
    }
}

/// Explains what a distribution shape means for the mean and the median.
pub(crate) fn write_shape(out: &mut dyn Write, shape: Shape) -> io::Result<()> {
    match shape {
        Shape::Symmetric => {
            writeln!(out, "The distribution is approximately SYMMETRIC (skewness near 0)")?;
            writeln!(out, "  - The data is fairly evenly distributed around the mean.")?;
            writeln!(out, "  - Mean and median are close to each other.")
        }
        Shape::PositivelySkewed => {
            writeln!(out, "The distribution is POSITIVELY SKEWED (right-skewed)")?;
            writeln!(out, "  - The tail extends further to the right (higher values).")?;
            writeln!(out, "  - Mean is greater than median.")?;
            writeln!(out, "  - Most values are concentrated on the lower end.")
        }
        Shape::NegativelySkewed => {
            writeln!(out, "The distribution is NEGATIVELY SKEWED (left-skewed)")?;
            writeln!(out, "  - The tail extends further to the left (lower values).")?;
            writeln!(out, "  - Mean is less than median.")?;
            writeln!(out, "  - Most values are concentrated on the higher end.")
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use descry_stats::frequency::FrequencyTable;

    use super::*;

    pub(crate) fn text_context() -> ReportContext {
        ReportContext {
            format: OutputFormat::Text,
            chart_dir: None,
            terminal_chart: false,
        }
    }

    pub(crate) fn json_context() -> ReportContext {
        ReportContext {
            format: OutputFormat::Json,
            ..text_context()
        }
    }

    pub(crate) fn render<F>(ctx: &ReportContext, run: F) -> String
    where
        F: FnOnce(&ReportContext, &mut dyn Write) -> anyhow::Result<()>,
    {
        let mut buf = Vec::new();
        run(ctx, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_describe_mode() {
        let table = FrequencyTable::from_samples(&[1.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(describe_mode(&table.mode()), "2, 3 (frequency 2)");
        let unique = FrequencyTable::from_samples(&[1.0, 2.0]);
        assert_eq!(describe_mode(&unique.mode()), "None (all values unique)");
    }

    #[test]
    fn test_middle_values() {
        assert_eq!(middle_values(&[1.0, 2.0, 3.0, 4.0]), [2.0, 3.0]);
        assert_eq!(middle_values(&[1.0, 2.0, 3.0]), [2.0]);
        assert!(middle_values(&[]).is_empty());
    }

    #[test]
    fn test_write_shape() {
        let mut out = Vec::new();
        write_shape(&mut out, Shape::PositivelySkewed).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("POSITIVELY SKEWED"));
        assert!(text.contains("Mean is greater than median."));
    }

    #[test]
    fn test_format_parses_case_insensitively() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_file_is_flushed_on_finish() {
        let path = std::env::temp_dir().join(format!("descry-output-{}.txt", std::process::id()));
        let mut output = Output::new(Some(path.clone())).unwrap();
        assert_eq!(output.to_string(), path.display().to_string());
        let ctx = json_context();
        ctx.write_json(&mut output, &serde_json::json!({ "count": 3 }))
            .unwrap();
        output.finish().unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["count"], 3);
        assert!(written.ends_with('\n'));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_chart_writes_file() {
        let dir = std::env::temp_dir().join(format!("descry-chart-test-{}", std::process::id()));
        let ctx = ReportContext {
            chart_dir: Some(dir.clone()),
            ..text_context()
        };
        let mut out = Vec::new();
        ctx.save_chart(&mut out, "test.svg", || Ok("<svg></svg>".to_string()))
            .unwrap();
        let written = fs::read_to_string(dir.join("test.svg")).unwrap();
        assert_eq!(written, "<svg></svg>");
        assert!(String::from_utf8(out).unwrap().starts_with("Saved "));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_charts_disabled() {
        let mut out = Vec::new();
        text_context()
            .save_chart(&mut out, "never.svg", || panic!("chart rendered"))
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_terminal_chart() {
        let ctx = ReportContext {
            terminal_chart: true,
            ..text_context()
        };
        let mut out = Vec::new();
        ctx.terminal_chart(&mut out, "Counts", &[("a".to_string(), 3)])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Counts"));

        let mut out = Vec::new();
        text_context()
            .terminal_chart(&mut out, "Counts", &[("a".to_string(), 3)])
            .unwrap();
        assert!(out.is_empty());
    }
}
