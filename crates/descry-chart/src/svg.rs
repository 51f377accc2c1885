//! SVG chart drivers
//!
//! Every driver renders a complete SVG document into a `String` with the `plotters`
//! SVG backend. Callers decide where the document is written.
//!
//! Categorical charts ([`bar_chart`], [`annotated_bar_chart`], [`grouped_bar_chart`])
//! place one bar per category at integer x positions, so markers can be positioned
//! between bars with [`crate::nominal_position`].

use std::{fmt::Display, ops::Range};

use descry_stats::{
    binning::ClassBinning,
    bivariate::LinearRegression,
    contingency::ContingencyTable,
    frequency::FrequencyTable,
    quartiles::QuartileMethod,
    summary::SummaryStatistics,
};
use plotters::{
    coord::{Shift, cartesian::Cartesian2d, types::RangedCoordf64},
    prelude::*,
};

use crate::{ChartError, ChartOptions, nominal_position};

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

const MARKER_COLORS: [RGBColor; 2] = [RGBColor(220, 20, 60), RGBColor(34, 139, 34)];

/// Fraction of a unit slot occupied by a bar (or a group of bars).
const BAR_WIDTH: f64 = 0.8;

type Root<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn palette(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// A vertical reference line on a categorical chart, such as the mean or median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    pub label: &'a str,
    pub value: f64,
}

/// Points of one category in a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterGroup<'a> {
    pub label: &'a str,
    pub points: &'a [(f64, f64)],
}

fn render<F>(options: &ChartOptions, draw: F) -> Result<String, ChartError>
where
    F: FnOnce(&Root<'_>) -> Result<(), ChartError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(ChartError::draw)?;
        draw(&root)?;
        root.present().map_err(ChartError::draw)?;
    }
    tracing::debug!(title = %options.title, bytes = svg.len(), "rendered SVG chart");
    Ok(svg)
}

fn cartesian<'a, 'b>(
    root: &'a Root<'b>,
    options: &ChartOptions,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart<'a, 'b>, ChartError> {
    ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(ChartError::draw)
}

/// Builds a chart with one slot per label and draws its axes.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn nominal_chart<'a, 'b>(
    root: &'a Root<'b>,
    options: &ChartOptions,
    labels: &[String],
    y_max: f64,
) -> Result<Chart<'a, 'b>, ChartError> {
    let mut chart = cartesian(
        root,
        options,
        -0.5..labels.len() as f64 - 0.5,
        0.0..count_axis_top(y_max),
    )?;

    let label_at = |x: &f64| {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&label_at)
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()
        .map_err(ChartError::draw)?;
    Ok(chart)
}

fn count_axis_top(max: f64) -> f64 {
    (max * 1.15).max(1.0)
}

fn padded(low: f64, high: f64) -> Range<f64> {
    let pad = ((high - low) * 0.05).max(0.5);
    (low - pad)..(high + pad)
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> Result<(), ChartError> {
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(ChartError::draw)
}

/// Draws a histogram of class intervals with adjacent bars.
///
/// Each bar starts at its interval's lower bound and ends where the next interval
/// starts; the last bar ends at the last interval's upper bound (or one class width
/// past its lower bound, whichever is greater).
#[expect(clippy::cast_precision_loss)]
pub fn histogram(binning: &ClassBinning, options: &ChartOptions) -> Result<String, ChartError> {
    let intervals = binning.intervals();
    let (Some(first), Some(last)) = (intervals.first(), intervals.last()) else {
        return Err(ChartError::EmptyData);
    };
    let right_edge = last.upper.max(last.lower + binning.width());
    let bars = intervals
        .iter()
        .enumerate()
        .map(|(idx, interval)| {
            let right = intervals.get(idx + 1).map_or(right_edge, |next| next.lower);
            (interval.lower, right, interval.count as f64)
        })
        .collect::<Vec<_>>();
    let y_max = bars.iter().map(|(_, _, count)| *count).fold(0.0, f64::max);

    render(options, |root| {
        let mut chart = cartesian(
            root,
            options,
            first.lower..right_edge,
            0.0..count_axis_top(y_max),
        )?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(ChartError::draw)?;

        chart
            .draw_series(bars.iter().map(|&(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count)], palette(0).mix(0.8).filled())
            }))
            .map_err(ChartError::draw)?;
        chart
            .draw_series(bars.iter().map(|&(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count)], BLACK.stroke_width(1))
            }))
            .map_err(ChartError::draw)?;
        Ok(())
    })
}

/// Draws one bar per `(label, value)` pair.
#[expect(clippy::cast_precision_loss)]
pub fn bar_chart<L>(bars: &[(L, f64)], options: &ChartOptions) -> Result<String, ChartError>
where
    L: AsRef<str>,
{
    if bars.is_empty() {
        return Err(ChartError::EmptyData);
    }
    let labels = bars
        .iter()
        .map(|(label, _)| label.as_ref().to_owned())
        .collect::<Vec<_>>();
    let y_max = bars.iter().map(|(_, value)| *value).fold(0.0, f64::max);

    render(options, |root| {
        let mut chart = nominal_chart(root, options, &labels, y_max)?;
        chart
            .draw_series(bars.iter().enumerate().map(|(idx, (_, value))| {
                let center = idx as f64;
                Rectangle::new(
                    [(center - BAR_WIDTH / 2.0, 0.0), (center + BAR_WIDTH / 2.0, *value)],
                    palette(idx).filled(),
                )
            }))
            .map_err(ChartError::draw)?;
        Ok(())
    })
}

/// Draws a frequency table as bars and overlays a vertical line per marker.
///
/// Markers are placed with [`nominal_position`], so a mean of 40.03 lands just right
/// of the bar for 40.
#[expect(clippy::cast_precision_loss)]
pub fn annotated_bar_chart(
    table: &FrequencyTable<f64>,
    markers: &[Marker<'_>],
    options: &ChartOptions,
) -> Result<String, ChartError> {
    if table.is_empty() {
        return Err(ChartError::EmptyData);
    }
    let keys = table.keys().copied().collect::<Vec<_>>();
    let labels = keys.iter().map(ToString::to_string).collect::<Vec<_>>();
    let y_max = table.max_frequency() as f64;
    let line_top = count_axis_top(y_max);

    render(options, |root| {
        let mut chart = nominal_chart(root, options, &labels, y_max)?;
        chart
            .draw_series(table.entries().iter().enumerate().map(|(idx, entry)| {
                let center = idx as f64;
                Rectangle::new(
                    [
                        (center - BAR_WIDTH / 2.0, 0.0),
                        (center + BAR_WIDTH / 2.0, entry.count as f64),
                    ],
                    palette(0).mix(0.7).filled(),
                )
            }))
            .map_err(ChartError::draw)?;

        for (idx, marker) in markers.iter().enumerate() {
            let Some(pos) = nominal_position(&keys, marker.value) else {
                continue;
            };
            let color = MARKER_COLORS[idx % MARKER_COLORS.len()];
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(pos, 0.0), (pos, line_top)],
                    color.stroke_width(2),
                )))
                .map_err(ChartError::draw)?
                .label(format!("{} ({:.2})", marker.label, marker.value))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
        if !markers.is_empty() {
            draw_legend(&mut chart)?;
        }
        Ok(())
    })
}

/// Draws a contingency table as side-by-side bars, one cluster per bucket and one
/// colored bar per group.
#[expect(clippy::cast_precision_loss)]
pub fn grouped_bar_chart<G>(
    table: &ContingencyTable<G>,
    options: &ChartOptions,
) -> Result<String, ChartError>
where
    G: Display,
{
    let groups = table.groups();
    if table.buckets().is_empty() || groups.is_empty() {
        return Err(ChartError::EmptyData);
    }
    let labels = table
        .buckets()
        .iter()
        .map(|bucket| bucket.label.clone())
        .collect::<Vec<_>>();
    let y_max = (0..labels.len())
        .flat_map(|bucket_idx| table.row(bucket_idx).iter().copied())
        .max()
        .unwrap_or(0) as f64;
    let bar_width = BAR_WIDTH / groups.len() as f64;

    render(options, |root| {
        let mut chart = nominal_chart(root, options, &labels, y_max)?;
        for (group_idx, group) in groups.iter().enumerate() {
            let color = palette(group_idx);
            let offset = -BAR_WIDTH / 2.0 + group_idx as f64 * bar_width;
            chart
                .draw_series((0..labels.len()).map(|bucket_idx| {
                    let left = bucket_idx as f64 + offset;
                    let count = table.row(bucket_idx)[group_idx] as f64;
                    Rectangle::new([(left, 0.0), (left + bar_width, count)], color.filled())
                }))
                .map_err(ChartError::draw)?
                .label(group.to_string())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }
        draw_legend(&mut chart)
    })
}

/// Draws a box plot: a box from Q1 to Q3, a line at the median, whiskers to the
/// most extreme observations inside the fences and a point per outlier.
pub fn box_plot(
    values: &[f64],
    method: QuartileMethod,
    options: &ChartOptions,
) -> Result<String, ChartError> {
    let stats = SummaryStatistics::new(values, method)?;
    let fences = stats.fences;
    let inside = values.iter().copied().filter(|v| !fences.is_outlier(*v));
    let whisker_low = inside.clone().fold(f64::INFINITY, f64::min);
    let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max);
    let (q1, q3) = (stats.quartiles.q1, stats.quartiles.q3);

    render(options, |root| {
        let mut chart = cartesian(root, options, 0.0..2.0, padded(stats.min, stats.max))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_desc(&options.y_label)
            .draw()
            .map_err(ChartError::draw)?;

        let color = palette(0);
        chart
            .draw_series([
                Rectangle::new([(0.7, q1), (1.3, q3)], color.mix(0.3).filled()),
                Rectangle::new([(0.7, q1), (1.3, q3)], color.stroke_width(2)),
            ])
            .map_err(ChartError::draw)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.7, stats.median), (1.3, stats.median)],
                BLACK.stroke_width(3),
            )))
            .map_err(ChartError::draw)?;
        let whiskers = [
            vec![(1.0, q3), (1.0, whisker_high)],
            vec![(1.0, q1), (1.0, whisker_low)],
            vec![(0.85, whisker_high), (1.15, whisker_high)],
            vec![(0.85, whisker_low), (1.15, whisker_low)],
        ];
        chart
            .draw_series(
                whiskers
                    .into_iter()
                    .map(|path| PathElement::new(path, BLACK.stroke_width(1))),
            )
            .map_err(ChartError::draw)?;
        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((1.0, v), 4, RED.filled())),
            )
            .map_err(ChartError::draw)?;
        Ok(())
    })
}

/// Draws each group's points in its own color and overlays the fitted line across
/// the observed x range.
pub fn scatter_with_regression(
    groups: &[ScatterGroup<'_>],
    fit: &LinearRegression,
    options: &ChartOptions,
) -> Result<String, ChartError> {
    let points = groups.iter().flat_map(|group| group.points.iter().copied());
    let (x_min, x_max, y_min, y_max) = points.fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(x_min, x_max, y_min, y_max), (x, y)| {
            (x_min.min(x), x_max.max(x), y_min.min(y), y_max.max(y))
        },
    );
    if x_min > x_max {
        return Err(ChartError::EmptyData);
    }
    let line = [(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))];
    let y_min = line.iter().map(|(_, y)| *y).fold(y_min, f64::min);
    let y_max = line.iter().map(|(_, y)| *y).fold(y_max, f64::max);

    render(options, |root| {
        let mut chart = cartesian(root, options, padded(x_min, x_max), padded(y_min, y_max))?;
        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(ChartError::draw)?;

        for (idx, group) in groups.iter().enumerate() {
            let color = palette(idx);
            chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(|&point| Circle::new(point, 4, color.filled())),
                )
                .map_err(ChartError::draw)?
                .label(group.label)
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
        }
        chart
            .draw_series(std::iter::once(PathElement::new(
                line.to_vec(),
                BLACK.stroke_width(2),
            )))
            .map_err(ChartError::draw)?
            .label(format!("y = {:.4}x + {:.4}", fit.slope, fit.intercept))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2))
            });
        draw_legend(&mut chart)
    })
}

#[cfg(test)]
mod tests {
    use descry_stats::{
        binning::{BoundaryPolicy, ClassBinning},
        bivariate::linear_regression,
        contingency::{Bucket, binned_contingency},
    };

    use super::*;

    const WHEAT: [f64; 30] = [
        145.0, 152.0, 138.0, 167.0, 155.0, 161.0, 143.0, 158.0, 149.0, 172.0, 162.0, 147.0, 154.0,
        168.0, 141.0, 159.0, 165.0, 150.0, 163.0, 140.0, 156.0, 169.0, 144.0, 160.0, 153.0, 166.0,
        142.0, 157.0, 151.0, 164.0,
    ];

    fn is_svg(doc: &str) -> bool {
        doc.contains("<svg") && doc.trim_end().ends_with("</svg>")
    }

    #[test]
    fn test_histogram() {
        let binning = ClassBinning::with_policy(&WHEAT, 6, BoundaryPolicy::Closed).unwrap();
        let options = ChartOptions::new("Wheat yield").axes("Yield", "Plots");
        let doc = histogram(&binning, &options).unwrap();
        assert!(is_svg(&doc));
        assert!(doc.contains("Wheat yield"));
    }

    #[test]
    fn test_bar_chart() {
        let bars = [("high", 9.0), ("medium", 5.0), ("low", 6.0)];
        let doc = bar_chart(&bars, &ChartOptions::new("Crunchiness")).unwrap();
        assert!(is_svg(&doc));
        assert!(doc.contains("medium"));
    }

    #[test]
    fn test_empty_bar_chart() {
        let bars: [(&str, f64); 0] = [];
        assert!(matches!(
            bar_chart(&bars, &ChartOptions::new("Nothing")),
            Err(ChartError::EmptyData)
        ));
    }

    #[test]
    fn test_annotated_bar_chart() {
        let table = FrequencyTable::from_samples(&[38.0, 40.0, 40.0, 41.0, 42.0]);
        let markers = [
            Marker {
                label: "Mean",
                value: 40.2,
            },
            Marker {
                label: "Median",
                value: 40.0,
            },
        ];
        let doc = annotated_bar_chart(&table, &markers, &ChartOptions::new("Hours")).unwrap();
        assert!(is_svg(&doc));
        assert!(doc.contains("Median"));
    }

    #[test]
    fn test_grouped_bar_chart() {
        let records = [(0.5, "good"), (1.5, "bad"), (2.5, "good"), (3.5, "good")];
        let buckets = [Bucket::at_most("<=2", 2.0), Bucket::above(">2", 2.0)];
        let table = binned_contingency(&records, &buckets, |r| r.0, |r| r.1);
        let doc = grouped_bar_chart(&table, &ChartOptions::new("Sweetness")).unwrap();
        assert!(is_svg(&doc));
        assert!(doc.contains("good"));
        assert!(doc.contains("bad"));
    }

    #[test]
    fn test_box_plot() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 40.0];
        let doc = box_plot(&values, QuartileMethod::MedianOfHalves, &ChartOptions::new("Box"))
            .unwrap();
        assert!(is_svg(&doc));
        assert!(matches!(
            box_plot(&[], QuartileMethod::MedianOfHalves, &ChartOptions::new("Box")),
            Err(ChartError::Stats(_))
        ));
    }

    #[test]
    fn test_scatter_with_regression() {
        let good = [(70.0, 0.5), (83.0, 1.0), (85.0, 3.0)];
        let bad = [(90.0, 1.0), (78.0, 0.5)];
        let (xs, ys): (Vec<_>, Vec<_>) = good.iter().chain(&bad).copied().unzip();
        let fit = linear_regression(&xs, &ys).unwrap();
        let groups = [
            ScatterGroup {
                label: "good",
                points: &good,
            },
            ScatterGroup {
                label: "bad",
                points: &bad,
            },
        ];
        let options = ChartOptions::new("Weight vs sweetness");
        let doc = scatter_with_regression(&groups, &fit, &options).unwrap();
        assert!(is_svg(&doc));

        let empty = [ScatterGroup {
            label: "none",
            points: &[],
        }];
        assert!(matches!(
            scatter_with_regression(&empty, &fit, &ChartOptions::new("Empty")),
            Err(ChartError::EmptyData)
        ));
    }
}
