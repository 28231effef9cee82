use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::marker::{draw_marker_at, draw_markers};
use super::{font, render_err};
use crate::config::{
    points_to_px, ReportConfig, PAGE_HEIGHT, PAGE_WIDTH, SUBPLOT_SPACING, TITLE_FONT_SIZE,
};
use crate::document::{PageKind, RenderedPage};
use crate::error::Result;
use crate::style::{LineKind, LineStyle};

// ---------------------------------------------------------------------------
// Page description
// ---------------------------------------------------------------------------

/// One file's data for one measure.
#[derive(Debug, Clone)]
pub struct ChartSeries<'a> {
    pub points: Vec<(f64, f64)>,
    pub style: &'a LineStyle,
    pub color: RGBColor,
}

/// One subplot: every file's series for a single measure.
#[derive(Debug, Clone)]
pub struct ChartPanel<'a> {
    pub row: usize,
    pub col: usize,
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Tick labels when x positions index categories rather than values.
    pub x_categories: Option<&'a [String]>,
    pub series: Vec<ChartSeries<'a>>,
}

#[derive(Debug, Clone)]
pub struct LegendEntry<'a> {
    pub label: &'a str,
    pub style: &'a LineStyle,
    pub color: RGBColor,
}

/// Everything drawn on one chart page.
#[derive(Debug, Clone)]
pub struct ChartPage<'a> {
    pub title: &'a str,
    pub panels: Vec<ChartPanel<'a>>,
    pub legend: Vec<LegendEntry<'a>>,
}

/// Render a chart page to SVG.
pub fn render_chart_page(page: &ChartPage<'_>, config: &ReportConfig) -> Result<RenderedPage> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PAGE_WIDTH, PAGE_HEIGHT)).into_drawing_area();
        draw_chart_page(&root, page, config).map_err(render_err)?;
        root.present().map_err(render_err)?;
    }
    Ok(RenderedPage {
        kind: PageKind::Chart,
        svg,
    })
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Lay out the page as `rows + 1` grid rows: the plots fill the first
/// `rows`, the legend sits in the last one.
pub fn draw_chart_page<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    page: &ChartPage<'_>,
    config: &ReportConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let body = root.titled(page.title, font(points_to_px(TITLE_FONT_SIZE)))?;

    let (_, body_height) = body.dim_in_pixel();
    let row_height = body_height / config.grid_rows() as u32;
    let (grid, legend_area) = body.split_vertically(row_height * config.rows_per_page as u32);
    let cells = grid.split_evenly((config.rows_per_page, config.cols_per_page));

    for panel in &page.panels {
        let index = panel.row * config.cols_per_page + panel.col;
        if let Some(cell) = cells.get(index) {
            draw_panel(cell, panel, config)?;
        }
    }

    draw_legend(&legend_area, &page.legend, config)
}

fn draw_panel<DB: DrawingBackend>(
    cell: &DrawingArea<DB, Shift>,
    panel: &ChartPanel<'_>,
    config: &ReportConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let font_px = config.font_px();
    let (width, height) = cell.dim_in_pixel();
    let gap_x = (width as f64 * SUBPLOT_SPACING / 2.0) as u32;
    let gap_y = (height as f64 * SUBPLOT_SPACING / 2.0) as u32;

    let (mut x_range, y_range) = panel_ranges(&panel.series);
    if let Some(categories) = panel.x_categories {
        x_range = category_range(categories.len());
    }
    let mut chart = ChartBuilder::on(cell)
        .margin_left(gap_x / 2)
        .margin_right(gap_x / 2)
        .margin_top(gap_y / 2)
        .margin_bottom(gap_y / 2)
        .x_label_area_size((font_px * 3.0) as u32)
        .y_label_area_size((font_px * 5.0) as u32)
        .build_cartesian_2d(x_range, y_range)?;

    let category_label = |x: &f64| category_at(panel.x_categories.unwrap_or_default(), *x);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .label_style(font(font_px))
        .axis_desc_style(font(font_px));
    if let Some(categories) = panel.x_categories {
        mesh.x_labels(categories.len())
            .x_label_formatter(&category_label);
    }
    mesh.draw()?;

    let line_width = 1;
    let marker_radius = (font_px * 0.35).round() as i32;
    for series in &panel.series {
        let line_style = series.color.stroke_width(line_width);
        match series.style.line {
            LineKind::None => {}
            LineKind::Solid => {
                chart.draw_series(LineSeries::new(series.points.iter().copied(), line_style))?;
            }
            kind => {
                let (dash, gap) = kind.dash_pattern().unwrap_or((6, 4));
                chart.draw_series(DashedLineSeries::new(
                    series.points.iter().copied(),
                    dash,
                    gap,
                    line_style,
                ))?;
            }
        }
        if let Some(marker) = series.style.marker {
            draw_markers(&mut chart, &series.points, marker, marker_radius, series.color)?;
        }
    }
    Ok(())
}

/// Data ranges with a 5% margin. Empty or flat data still yields a
/// non-degenerate range.
pub fn panel_ranges(series: &[ChartSeries<'_>]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    (padded(x_min, x_max), padded(y_min, y_max))
}

fn padded(min: f64, max: f64) -> std::ops::Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max - min < f64::EPSILON {
        let half = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
        return (min - half)..(max + half);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Categories sit at `0..n` with half a slot of space on either side.
fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Tick text for a categorical axis; ticks between slots stay blank.
fn category_at(categories: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    categories.get(slot as usize).cloned().unwrap_or_default()
}

/// Legend entries fill the columns top to bottom, then left to right.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry<'_>],
    config: &ReportConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if entries.is_empty() {
        return Ok(());
    }
    let font_px = config.font_px();
    let text_style = TextStyle::from(font(font_px))
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let sample_width = (font_px * 3.0) as i32;
    let padding = (font_px * 0.6) as i32;
    let entry_height = (font_px * 1.6) as i32;
    let label_width = entries
        .iter()
        .map(|e| area.estimate_text_size(e.label, &text_style).map(|(w, _)| w as i32))
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .max()
        .unwrap_or(0);

    let columns = config.legend_cols.min(entries.len());
    let per_column = entries.len().div_ceil(columns);
    let column_width = sample_width + padding * 3 + label_width;

    let (area_width, _) = area.dim_in_pixel();
    let left = ((area_width as f64 * SUBPLOT_SPACING / 4.0) as i32).max(padding);
    let top = padding;
    let box_width = column_width * columns as i32 + padding;
    let box_height = entry_height * per_column as i32 + padding;
    area.draw(&Rectangle::new(
        [(left, top), (left + box_width, top + box_height)],
        BLACK.mix(0.3).stroke_width(1),
    ))?;

    let marker_radius = (font_px * 0.35).round() as i32;
    for (i, entry) in entries.iter().enumerate() {
        let column = (i / per_column) as i32;
        let row = (i % per_column) as i32;
        let x = left + padding + column * column_width;
        let y = top + padding / 2 + row * entry_height + entry_height / 2;

        draw_line_sample(area, (x, y), sample_width, entry.style.line, entry.color)?;
        if let Some(marker) = entry.style.marker {
            draw_marker_at(area, (x + sample_width / 2, y), marker, marker_radius, entry.color)?;
        }
        area.draw(&Text::new(
            entry.label.to_string(),
            (x + sample_width + padding, y),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

fn draw_line_sample<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    (x, y): (i32, i32),
    width: i32,
    kind: LineKind,
    color: RGBColor,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = color.stroke_width(1);
    match kind {
        LineKind::None => {}
        LineKind::Solid => {
            area.draw(&PathElement::new(vec![(x, y), (x + width, y)], style))?;
        }
        dashed => {
            let (dash, gap) = dashed.dash_pattern().unwrap_or((6, 4));
            for (start, end) in dash_segments(width, dash as i32, gap as i32) {
                area.draw(&PathElement::new(vec![(x + start, y), (x + end, y)], style))?;
            }
        }
    }
    Ok(())
}

/// Split `[0, width]` into dash segments.
fn dash_segments(width: i32, dash: i32, gap: i32) -> Vec<(i32, i32)> {
    let step = (dash + gap).max(1);
    (0..width)
        .step_by(step as usize)
        .map(|start| (start, (start + dash.max(1)).min(width)))
        .collect()
}
