//! SVG rendering of an occupancy grid with an optional path overlay.

use crate::common::ApplicationResult;
use crate::domains::navigation::grid::{Cell, Grid, Position};
use std::fmt::Write;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct SvgStyle {
    /// Pixels per cell
    pub cell_size: f64,
    pub free: &'static str,
    pub obstacle: &'static str,
    pub start: &'static str,
    pub goal: &'static str,
    pub path: &'static str,
    pub path_width: f64,
    pub title: Option<String>,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            free: "#FFFFFF",
            obstacle: "#000000",
            start: "#808080",
            goal: "#B3B3B3",
            path: "#FF0000",
            path_width: 2.0,
            title: None,
        }
    }
}

impl SvgStyle {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn fill(&self, cell: Cell) -> &'static str {
        match cell {
            Cell::Free => self.free,
            Cell::Obstacle => self.obstacle,
            Cell::Start => self.start,
            Cell::Goal => self.goal,
        }
    }
}

const TITLE_HEIGHT: f64 = 24.0;

/// Render `grid` and `path` to an SVG document.
pub fn render_svg(grid: &Grid, path: &[Position], style: &SvgStyle) -> String {
    let size = style.cell_size;
    let top = if style.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let width = grid.cols() as f64 * size;
    let height = grid.rows() as f64 * size + top;

    let mut svg = String::new();
    // fmt::Write into a String is infallible
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
    );
    if let Some(title) = &style.title {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
            width / 2.0,
            TITLE_HEIGHT * 0.7,
            escape(title)
        );
    }

    let _ = writeln!(svg, r#"  <g shape-rendering="crispEdges">"#);
    for (position, cell) in grid.iter() {
        let _ = writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="{size:.1}" height="{size:.1}" fill="{}"/>"#,
            position.col as f64 * size,
            position.row as f64 * size + top,
            style.fill(cell)
        );
    }
    let _ = writeln!(svg, "  </g>");

    if path.len() > 1 {
        let points: Vec<String> = path
            .iter()
            .map(|p| {
                format!(
                    "{:.1},{:.1}",
                    (p.col as f64 + 0.5) * size,
                    (p.row as f64 + 0.5) * size + top
                )
            })
            .collect();
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linejoin="round"/>"#,
            points.join(" "),
            style.path,
            style.path_width
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write to `file`, creating parent directories as needed.
pub fn save_svg<P: AsRef<Path>>(
    grid: &Grid,
    path: &[Position],
    style: &SvgStyle,
    file: P,
) -> ApplicationResult<()> {
    let file = file.as_ref();
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file, render_svg(grid, path, style))?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
