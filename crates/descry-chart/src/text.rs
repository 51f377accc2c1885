//! Terminal bar charts
//!
//! [`BarPanel`] is a `ratatui` widget showing a horizontal bar chart inside a titled
//! border. [`render_lines`] draws any widget into an off-screen buffer and returns
//! its rows as plain strings, so reports can print charts without taking over the
//! terminal.

use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    symbols::merge::MergeStrategy,
    widgets::{Bar, BarChart, Block, Widget},
};

/// A horizontal bar chart with one labeled row per bar.
#[derive(Debug, Clone, Copy)]
pub struct BarPanel<'a> {
    pub title: &'a str,
    pub bars: &'a [(String, u64)],
}

impl BarPanel<'_> {
    /// Returns the number of terminal rows the panel needs, borders included.
    #[must_use]
    pub fn height(&self) -> u16 {
        u16::try_from(self.bars.len())
            .unwrap_or(u16::MAX - 2)
            .saturating_add(2)
    }
}

impl Widget for BarPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::bordered()
            .merge_borders(MergeStrategy::Exact)
            .title(self.title);

        let chart = BarChart::new(
            self.bars
                .iter()
                .map(|(label, count)| {
                    Bar::with_label(label.as_str(), *count).text_value(count.to_string())
                })
                .collect::<Vec<_>>(),
        )
        .direction(Direction::Horizontal)
        .bar_gap(0);

        let inner = block.inner(area);
        Widget::render(block, area, buf);
        Widget::render(chart, inner, buf);
    }
}

/// Draws `widget` into a `width` x `height` buffer and returns its rows with
/// trailing blanks trimmed.
#[must_use]
pub fn render_lines<W>(widget: W, width: u16, height: u16) -> Vec<String>
where
    W: Widget,
{
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);

    (0..area.height)
        .map(|y| {
            let line = (0..area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>();
            line.trim_end().to_owned()
        })
        .collect()
}

/// Renders a [`BarPanel`] of the given width, sized to fit every bar.
#[must_use]
pub fn bar_chart_lines(title: &str, bars: &[(String, u64)], width: u16) -> Vec<String> {
    let panel = BarPanel { title, bars };
    let height = panel.height();
    render_lines(panel, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripeness() -> Vec<(String, u64)> {
        [("1", 4), ("2", 7), ("3", 6), ("4", 3)]
            .into_iter()
            .map(|(label, count)| (format!("ripeness {label}"), count))
            .collect()
    }

    #[test]
    fn test_panel_shows_title_and_labels() {
        let lines = bar_chart_lines("Ripeness", &ripeness(), 60);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Ripeness"));
        for label in ["ripeness 1", "ripeness 2", "ripeness 3", "ripeness 4"] {
            assert!(
                lines.iter().any(|line| line.contains(label)),
                "missing {label}: {lines:#?}"
            );
        }
    }

    #[test]
    fn test_longest_bar_is_widest() {
        let lines = bar_chart_lines("Ripeness", &ripeness(), 60);
        let bar_cells = |line: &str| line.chars().filter(|c| *c == '█').count();
        // rows 1..=4 hold the bars in input order
        let widest = (1..=4).max_by_key(|row| bar_cells(&lines[*row])).unwrap();
        assert_eq!(widest, 2);
    }

    #[test]
    fn test_empty_panel_is_just_a_border() {
        let lines = bar_chart_lines("Empty", &[], 20);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('┌'));
        assert!(lines[1].starts_with('└'));
    }
}
