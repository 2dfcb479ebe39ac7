// Static chart images for the spreadsheet report.
//
// All four charts are 600x400 PNGs on white. Categorical axes are segmented:
// category i owns segment i and its label sits at the segment centre.
use crate::error::ReportError;
use crate::reports::{screen_time_by_sleep_quality, sleep_by_occupation, sleep_by_work_mode};
use crate::types::{CategorySamples, Dataset, GroupMean};
use crate::util::{box_stats, round2};
use log::info;
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::RangedCoordusize;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::{Path, PathBuf};

pub const CHART_SIZE: (u32, u32) = (600, 400);

pub const CHART_FILES: [&str; 4] = ["chart1.png", "chart2.png", "chart3.png", "chart4.png"];

const OCCUPATION_BAR: RGBColor = RGBColor(0x55, 0x8E, 0xD5);
const WORK_MODE_BAR: RGBColor = RGBColor(0x70, 0xAD, 0x47);
const BOX_FILL: RGBColor = RGBColor(0x40, 0x9A, 0xB5);
const BOX_MEDIAN: RGBColor = RGBColor(0xE1, 0xF3, 0xF8);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const BAR_HALF_WIDTH: f64 = 0.4;
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;

type DrawResult = Result<(), Box<dyn Error>>;

/// Render all four charts into `dir` and return their paths in
/// placement order.
pub fn render_charts(data: &Dataset, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let paths: Vec<PathBuf> = CHART_FILES.iter().map(|f| dir.join(f)).collect();

    let occupation = sleep_by_occupation(data);
    wrap(&paths[0], draw_occupation_chart(&paths[0], &occupation))?;

    let work_mode = sleep_by_work_mode(data);
    wrap(&paths[1], draw_work_mode_chart(&paths[1], &work_mode))?;

    let quality = screen_time_by_sleep_quality(data);
    wrap(&paths[2], draw_box_chart(&paths[2], &quality))?;

    let points: Vec<(f64, f64)> = data
        .records()
        .iter()
        .filter_map(|r| Some((r.screen_time_hours?, r.stress_level?)))
        .collect();
    wrap(&paths[3], draw_scatter_chart(&paths[3], &points))?;

    Ok(paths)
}

fn wrap(path: &Path, result: DrawResult) -> Result<(), ReportError> {
    result.map_err(|e| ReportError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("Chart written to {}", path.display());
    Ok(())
}

/// Work-mode means as plotted: rounded to 2 dp.
pub fn rounded_means(groups: &[GroupMean]) -> Vec<GroupMean> {
    groups
        .iter()
        .map(|g| GroupMean {
            mean: round2(g.mean),
            ..g.clone()
        })
        .collect()
}

fn max_mean(groups: &[GroupMean]) -> f64 {
    groups.iter().map(|g| g.mean).fold(0.0, f64::max)
}

/// Upper y bound of the work-mode chart: the tallest bar plus one hour.
pub fn work_mode_y_limit(groups: &[GroupMean]) -> f64 {
    max_mean(groups) + 1.0
}

fn occupation_y_limit(groups: &[GroupMean]) -> f64 {
    let max = max_mean(groups);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

/// Value range padded by 5% on each side, never empty.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}

fn category_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// One segment per category.
fn category_axis(n: usize) -> SegmentedCoord<RangedCoordusize> {
    (0..n.max(1) - 1).into_segmented()
}

/// Right edge of segment `i` out of `n`.
fn segment_end(i: usize, n: usize) -> SegmentValue<usize> {
    if i + 1 < n {
        SegmentValue::Exact(i + 1)
    } else {
        SegmentValue::Last
    }
}

/// Pixels to trim from each side of a segment so that what remains is
/// `2 * half_width` of the segment wide.
pub fn segment_inset(plot_width: u32, n: usize, half_width: f64) -> u32 {
    let segment = plot_width as f64 / n.max(1) as f64;
    (segment * (0.5 - half_width)).max(0.0).round() as u32
}

/// A span across segment `i`, inset by `inset` pixels on both sides.
/// With `y0 == y1` this draws a horizontal tick.
fn segment_rect<S: Into<ShapeStyle>>(
    i: usize,
    n: usize,
    (y0, y1): (f64, f64),
    inset: u32,
    style: S,
) -> Rectangle<(SegmentValue<usize>, f64)> {
    let mut rect = Rectangle::new(
        [(SegmentValue::Exact(i), y0), (segment_end(i, n), y1)],
        style,
    );
    rect.set_margin(0, 0, inset, inset);
    rect
}

fn draw_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    groups: &[GroupMean],
    color: RGBColor,
    y_max: f64,
    annotate: bool,
) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = groups.len();
    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d(category_axis(n), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_desc("Hours")
        .x_labels(n.max(1))
        .x_label_formatter(&|x| category_label(&labels, x))
        .draw()?;

    let inset = segment_inset(chart.plotting_area().dim_in_pixel().0, n, BAR_HALF_WIDTH);
    chart.draw_series(
        groups
            .iter()
            .enumerate()
            .map(|(i, g)| segment_rect(i, n, (0.0, g.mean), inset, color.filled())),
    )?;

    if annotate {
        let style = ("sans-serif", 14)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(groups.iter().enumerate().map(|(i, g)| {
            Text::new(
                format!("{:.2}", g.mean),
                (SegmentValue::CenterOf(i), g.mean + 0.05),
                style.clone(),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}

fn draw_occupation_chart(path: &Path, groups: &[GroupMean]) -> DrawResult {
    draw_bars(
        path,
        "Average Sleeping Hours by Occupation",
        "Occupation",
        groups,
        OCCUPATION_BAR,
        occupation_y_limit(groups),
        false,
    )
}

fn draw_work_mode_chart(path: &Path, groups: &[GroupMean]) -> DrawResult {
    let means = rounded_means(groups);
    draw_bars(
        path,
        "Average Sleeping Hours by Work Mode",
        "Work Mode",
        &means,
        WORK_MODE_BAR,
        work_mode_y_limit(&means),
        true,
    )
}

fn draw_box_chart(path: &Path, groups: &[CategorySamples]) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = groups.len();
    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let (y_lo, y_hi) = padded_range(groups.iter().flat_map(|g| g.values.iter().copied()));
    let mut chart = ChartBuilder::on(&root)
        .caption("Screen Time Distribution by Sleep Quality", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d(category_axis(n), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Sleep Quality")
        .y_desc("Screen Time (hours)")
        .axis_desc_style(("sans-serif", 15))
        .x_labels(n.max(1))
        .x_label_formatter(&|x| category_label(&labels, x))
        .draw()?;

    let plot_width = chart.plotting_area().dim_in_pixel().0;
    let box_inset = segment_inset(plot_width, n, BOX_HALF_WIDTH);
    let cap_inset = segment_inset(plot_width, n, CAP_HALF_WIDTH);

    for (i, group) in groups.iter().enumerate() {
        let Some(stats) = box_stats(&group.values) else {
            continue;
        };
        let center = || SegmentValue::CenterOf(i);

        chart.draw_series([
            PathElement::new(
                vec![(center(), stats.whisker_low), (center(), stats.q1)],
                GRAY.stroke_width(1),
            ),
            PathElement::new(
                vec![(center(), stats.q3), (center(), stats.whisker_high)],
                GRAY.stroke_width(1),
            ),
        ])?;

        let (low, high, median) = (stats.whisker_low, stats.whisker_high, stats.median);
        chart.draw_series([
            segment_rect(i, n, (low, low), cap_inset, GRAY.stroke_width(1)),
            segment_rect(i, n, (high, high), cap_inset, GRAY.stroke_width(1)),
            segment_rect(i, n, (stats.q1, stats.q3), box_inset, BOX_FILL.filled()),
            segment_rect(i, n, (stats.q1, stats.q3), box_inset, BLACK.stroke_width(1)),
            segment_rect(i, n, (median, median), box_inset, BOX_MEDIAN.stroke_width(1)),
        ])?;

        chart.draw_series(
            stats
                .outliers
                .iter()
                .map(|y| Circle::new((center(), *y), 3, DARK_BLUE.mix(0.5).filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

fn draw_scatter_chart(path: &Path, points: &[(f64, f64)]) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0));
    let (y_lo, y_hi) = padded_range(points.iter().map(|p| p.1));
    let mut chart = ChartBuilder::on(&root)
        .caption("Screen Time vs Stress Level", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Screen Time (hrs)")
        .y_desc("Stress Level (0-10)")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, 4, SKY_BLUE.mix(0.6).filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, 4, GRAY.mix(0.6).stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}
