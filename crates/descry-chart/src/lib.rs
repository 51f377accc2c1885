//! Chart rendering for descriptive statistics.
//!
//! This crate turns values computed by [`descry_stats`] into pictures:
//!
//! - [`svg`]: SVG documents drawn with `plotters` (histograms, bar charts, box plots,
//!   scatter plots with a fitted regression line)
//! - [`text`]: horizontal bar charts drawn into an off-screen `ratatui` buffer and
//!   returned as plain lines for terminal output
//!
//! Drivers only draw; every number they show is computed by the statistics crate.

pub use self::error::ChartError;

mod error;
pub mod svg;
pub mod text;

/// Size, title and axis descriptions shared by every SVG driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl ChartOptions {
    /// Default image width in pixels.
    pub const DEFAULT_WIDTH: u32 = 800;
    /// Default image height in pixels.
    pub const DEFAULT_HEIGHT: u32 = 480;

    /// Creates options with the given title, empty axis labels and the default size.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }

    #[must_use]
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Maps a numeric value onto a nominal bar axis.
///
/// Bars are placed at integer positions `0..keys.len()`, one per key. A value lying
/// between two neighbouring keys is interpolated linearly between their positions;
/// values outside the keys are clamped to the first or last bar. Returns `None` if
/// `keys` is empty.
///
/// # Panics
///
/// Panics if `keys` is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// # use descry_chart::nominal_position;
/// let hours = [35.0, 36.0, 37.0, 38.0, 39.0, 40.0];
/// assert_eq!(nominal_position(&hours, 37.5), Some(2.5));
/// assert_eq!(nominal_position(&hours, 10.0), Some(0.0));
/// assert_eq!(nominal_position(&hours, 99.0), Some(5.0));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn nominal_position(keys: &[f64], x: f64) -> Option<f64> {
    assert!(
        keys.is_sorted_by(|a, b| a <= b),
        "keys must be sorted in ascending order"
    );

    let first = *keys.first()?;
    let last = *keys.last()?;
    if x <= first {
        return Some(0.0);
    }
    if x >= last {
        return Some((keys.len() - 1) as f64);
    }
    keys.windows(2)
        .enumerate()
        .find(|(_, pair)| x >= pair[0] && x <= pair[1])
        .map(|(idx, pair)| {
            let (a, b) = (pair[0], pair[1]);
            let frac = if b > a { (x - a) / (b - a) } else { 0.0 };
            idx as f64 + frac
        })
}
