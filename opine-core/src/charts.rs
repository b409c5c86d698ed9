//! Chart rendering
//!
//! Draws the dashboard charts with `plotters` and returns them as SVG
//! strings, so the server can hand bytes straight to the client instead
//! of juggling files on disk. One histogram per rating category, one pie
//! for the location split.

use plotters::prelude::*;
use plotters::style::full_palette::{BLUE_500, GREEN_600, RED_400};
use thiserror::Error;

use super::rating::{Location, RatingCategory, RATING_MAX, RATING_MIN};
use super::stats::{LocationSplit, RatingHistogram};

const HISTOGRAM_SIZE: (u32, u32) = (520, 360);
const PIE_SIZE: (u32, u32) = (480, 360);

/// Chart rendering error
#[derive(Error, Debug)]
pub enum ChartError {
    /// Backend or layout failure while drawing
    #[error("Failed to render {chart} chart: {reason}")]
    Render { chart: &'static str, reason: String },

    /// Nothing to plot; callers normally skip charts for empty data
    #[error("No data to chart")]
    Empty,
}

impl ChartError {
    fn render(chart: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Render {
            chart,
            reason: err.to_string(),
        }
    }
}

/// Render one category's rating histogram as an SVG document.
///
/// Bars cover the full 1..=10 scale, including zero-count values, so the
/// x axis reads the same on every dashboard. Empty histograms are
/// rejected; the dashboard omits the chart instead.
pub fn render_histogram(
    category: RatingCategory,
    histogram: &RatingHistogram,
) -> Result<String, ChartError> {
    if histogram.is_empty() {
        return Err(ChartError::Empty);
    }

    let chart_name = category.as_str();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, HISTOGRAM_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::render(chart_name, e))?;

        let y_max = histogram.max_count() + 1;
        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} ratings", category.label()), ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(40)
            .build_cartesian_2d(
                (u32::from(RATING_MIN)..u32::from(RATING_MAX) + 1).into_segmented(),
                0u32..y_max,
            )
            .map_err(|e| ChartError::render(chart_name, e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Score")
            .y_desc("Reviews")
            .draw()
            .map_err(|e| ChartError::render(chart_name, e))?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE_500.mix(0.85).filled())
                    .margin(3)
                    .data(
                        histogram
                            .entries()
                            .map(|(value, count)| (u32::from(value), count)),
                    ),
            )
            .map_err(|e| ChartError::render(chart_name, e))?;

        root.present().map_err(|e| ChartError::render(chart_name, e))?;
    }

    Ok(svg)
}

/// Render the location split as an SVG pie chart.
///
/// Zero-count tags are dropped rather than drawn as empty slices; an
/// entirely empty split is rejected.
pub fn render_location_pie(split: &LocationSplit) -> Result<String, ChartError> {
    let slices = split.slices();
    if slices.is_empty() {
        return Err(ChartError::Empty);
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::render("location", e))?;

        let root = root
            .titled(
                "Location convenience",
                ("sans-serif", 24).into_font().color(&BLACK),
            )
            .map_err(|e| ChartError::render("location", e))?;

        let dims = root.dim_in_pixel();
        let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
        let radius = f64::from(dims.1.min(dims.0)) * 0.32;

        let sizes: Vec<f64> = slices.iter().map(|(_, count, _)| f64::from(*count)).collect();
        let colors: Vec<RGBColor> = slices.iter().map(|(loc, _, _)| slice_color(*loc)).collect();
        let labels: Vec<String> = slices
            .iter()
            .map(|(loc, _, pct)| format!("{} ({:.1}%)", loc.label(), pct))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));

        root.draw(&pie)
            .map_err(|e| ChartError::render("location", e))?;
        root.present()
            .map_err(|e| ChartError::render("location", e))?;
    }

    Ok(svg)
}

fn slice_color(location: Location) -> RGBColor {
    match location {
        Location::Convenient => GREEN_600,
        Location::NotConvenient => RED_400,
    }
}
