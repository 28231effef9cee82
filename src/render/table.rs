use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{font, render_err};
use crate::config::{ReportConfig, PAGE_HEIGHT, PAGE_WIDTH};
use crate::document::{PageKind, RenderedPage};
use crate::error::Result;

/// Parameter summary of one input file: its display name followed by
/// `name=value` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionTable {
    pub name: String,
    pub entries: Vec<String>,
}

impl DescriptionTable {
    /// All cells of the one-column table, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.entries.iter().map(String::as_str))
    }
}

/// Render up to `descriptions_per_page` stacked tables to SVG.
pub fn render_description_page(
    tables: &[DescriptionTable],
    config: &ReportConfig,
) -> Result<RenderedPage> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PAGE_WIDTH, PAGE_HEIGHT)).into_drawing_area();
        draw_description_page(&root, tables, config).map_err(render_err)?;
        root.present().map_err(render_err)?;
    }
    Ok(RenderedPage {
        kind: PageKind::Description,
        svg,
    })
}

pub fn draw_description_page<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    tables: &[DescriptionTable],
    config: &ReportConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let slots = root.split_evenly((config.descriptions_per_page, 1));
    for (table, slot) in tables.iter().zip(&slots) {
        draw_table(slot, table, config)?;
    }
    Ok(())
}

/// Draw one table centred in its slot.
fn draw_table<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &DescriptionTable,
    config: &ReportConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let font_px = config.font_px();
    let text_style = TextStyle::from(font(font_px))
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let padding = (font_px * 0.8) as i32;
    let row_height = (font_px * 2.0) as i32;
    let mut text_width = 0;
    for cell in table.cells() {
        let (w, _) = area.estimate_text_size(cell, &text_style)?;
        text_width = text_width.max(w as i32);
    }

    let rows = 1 + table.entries.len() as i32;
    let width = text_width + padding * 2;
    let height = row_height * rows;
    let (area_width, area_height) = area.dim_in_pixel();
    let left = (area_width as i32 - width) / 2;
    let top = ((area_height as i32 - height) / 2).max(0);

    for (i, cell) in table.cells().enumerate() {
        let y = top + i as i32 * row_height;
        area.draw(&Rectangle::new(
            [(left, y), (left + width, y + row_height)],
            BLACK.stroke_width(1),
        ))?;
        area.draw(&Text::new(
            cell.to_string(),
            (left + width / 2, y + row_height / 2),
            text_style.clone(),
        ))?;
    }
    Ok(())
}
