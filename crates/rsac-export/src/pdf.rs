//! PDF rendering via printpdf.
//!
//! A small manual table renderer: fixed column widths from an even division
//! of the printable width, explicit page breaks once the accumulated row
//! height exceeds the printable height, a watermark per page, and a legend
//! block from a per-group record breakdown. Chart images are embedded
//! best-effort on trailing pages.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};

use rsac_core::error::{ReportError, Result};
use rsac_core::models::{DashboardSummary, Row, SegmentStats, YearComparison};

use crate::images::ChartImage;

// printpdf's Mm wraps f32, so all page geometry is f32.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 5.0;

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Export(e.to_string())
}

/// Cursor over the current page/layer; adds pages as content overflows.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    font: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        font: &'a IndirectFontRef,
        bold: &'a IndirectFontRef,
        layer: PdfLayerReference,
    ) -> Self {
        let writer = Self {
            doc,
            font,
            bold,
            layer,
            y: PAGE_HEIGHT - MARGIN,
        };
        writer.watermark();
        writer
    }

    fn watermark(&self) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.88, 0.88, 0.88, None)));
        self.layer
            .use_text("RSAC", 60.0, Mm(70.0), Mm(PAGE_HEIGHT / 2.0), self.bold);
        self.layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.watermark();
    }

    /// Break the page when fewer than `needed` millimetres remain.
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_MARGIN {
            self.new_page();
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { self.bold } else { self.font };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }
}

/// Truncate cell text to what fits a column of `width` millimetres.
fn fit(text: &str, width: f32) -> String {
    let max_chars = (width / 1.7).max(3.0) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn embed_chart(writer: &mut PageWriter<'_>, chart: &ChartImage) {
    writer.new_page();
    writer.text(&chart.title, 12.0, MARGIN, true);
    writer.advance(8.0);

    let decoder = match PngDecoder::new(Cursor::new(chart.png.as_slice())) {
        Ok(decoder) => decoder,
        Err(e) => {
            tracing::warn!(chart = %chart.title, error = %e, "Skipping undecodable chart image");
            return;
        }
    };
    match Image::try_from(decoder) {
        Ok(image) => {
            image.add_to_layer(
                writer.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(MARGIN)),
                    translate_y: Some(Mm(writer.y - 110.0)),
                    dpi: Some(150.0),
                    ..Default::default()
                },
            );
        }
        Err(e) => {
            tracing::warn!(chart = %chart.title, error = %e, "Skipping unreadable chart image");
        }
    }
}

/// Render export rows as a paginated PDF table with a legend block and
/// best-effort chart pages.
pub fn render_report_pdf(
    title: &str,
    rows: &[Row],
    charts: &[ChartImage],
    legend: &[(String, i64)],
) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
    let first_layer = doc.get_page(page).get_layer(layer);

    let mut writer = PageWriter::new(&doc, &font, &bold, first_layer);
    writer.text(title, 16.0, MARGIN + 40.0, true);
    writer.advance(12.0);

    if let Some(first) = rows.first() {
        let headers: Vec<&String> = first.keys().collect();
        let printable = PAGE_WIDTH - 2.0 * MARGIN;
        // even division of the printable width
        let col_width = printable / headers.len() as f32;

        let header_line = |writer: &mut PageWriter<'_>| {
            for (i, header) in headers.iter().enumerate() {
                let x = MARGIN + i as f32 * col_width;
                writer.text(&fit(header, col_width), 7.0, x, true);
            }
            writer.advance(ROW_HEIGHT + 1.0);
        };

        header_line(&mut writer);
        for row in rows {
            if writer.y - ROW_HEIGHT < BOTTOM_MARGIN {
                writer.new_page();
                header_line(&mut writer);
            }
            for (i, value) in row.values().enumerate() {
                let x = MARGIN + i as f32 * col_width;
                writer.text(&fit(&crate::csv::cell_text(value), col_width), 6.5, x, false);
            }
            writer.advance(ROW_HEIGHT);
        }

        if !legend.is_empty() {
            writer.ensure_space(ROW_HEIGHT * (legend.len() as f32 + 3.0));
            writer.advance(ROW_HEIGHT);
            writer.text("Records by group", 10.0, MARGIN, true);
            writer.advance(ROW_HEIGHT + 1.0);
            for (label, count) in legend {
                writer.text(&format!("{label}: {count}"), 8.0, MARGIN + 4.0, false);
                writer.advance(ROW_HEIGHT);
            }
        }
    } else {
        writer.text("No records matched the selected filter.", 10.0, MARGIN, false);
    }

    for chart in charts {
        embed_chart(&mut writer, chart);
    }

    doc.save_to_bytes().map_err(pdf_err)
}

fn comparison_line(label: &str, c: &YearComparison) -> String {
    format!("{label}: 2010 {:.2} km, 2018 {:.2} km", c.y2010, c.y2018)
}

fn stats_line(label: &str, s: &SegmentStats) -> String {
    let mut parts = vec![format!("count {}", s.count)];
    if let Some(total) = s.total {
        parts.push(format!("total {total:.2}"));
    }
    if let Some(max) = s.max {
        parts.push(format!("max {max:.2}"));
    }
    if let Some(min) = s.min {
        parts.push(format!("min {min:.2}"));
    }
    format!("{label}: {}", parts.join(", "))
}

/// Render the transport dashboard summary to PDF, values included.
pub fn render_dashboard_pdf(summary: &DashboardSummary) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "RSAC Transport Dashboard Summary",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
    let first_layer = doc.get_page(page).get_layer(layer);

    let mut writer = PageWriter::new(&doc, &font, &bold, first_layer);
    writer.text("RSAC Transport Dashboard Summary", 18.0, MARGIN + 25.0, true);
    writer.advance(14.0);

    let section = |writer: &mut PageWriter<'_>, heading: &str, lines: Vec<String>| {
        writer.ensure_space(ROW_HEIGHT * (lines.len() as f32 + 3.0));
        writer.text(heading, 12.0, MARGIN, true);
        writer.advance(ROW_HEIGHT + 2.0);
        for line in lines {
            writer.text(&line, 9.0, MARGIN + 4.0, false);
            writer.advance(ROW_HEIGHT);
        }
        writer.advance(3.0);
    };

    let a = &summary.analytics;
    section(
        &mut writer,
        "Network Analytics (2010 vs 2018)",
        vec![
            comparison_line("National Highways", &a.nh),
            comparison_line("State Highways", &a.sh),
            comparison_line("Other Roads", &a.other),
            comparison_line("Railways", &a.rail),
        ],
    );
    section(
        &mut writer,
        "Expressways",
        vec![
            stats_line("Existing", &summary.expressways.existing),
            stats_line("Upcoming", &summary.expressways.upcoming),
        ],
    );
    section(&mut writer, "Ganga Cruise Route", vec![stats_line("Route", &summary.ganga)]);
    section(&mut writer, "UP Roadways Routes", vec![stats_line("Routes", &summary.roadways)]);
    section(&mut writer, "RTA Routes", vec![stats_line("Routes", &summary.rta)]);

    doc.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn rows() -> Vec<Row> {
        (1..=60)
            .map(|i| {
                let mut row = Row::new();
                row.insert("SNO".to_string(), Value::from(i));
                row.insert("DISTRICT".to_string(), Value::from("Lucknow"));
                row.insert("SARUS COUNT".to_string(), Value::from(i % 7));
                row
            })
            .collect()
    }

    #[test]
    fn test_report_pdf_renders() {
        let legend = vec![("Lucknow".to_string(), 60i64)];
        let bytes = render_report_pdf("RSAC Sarus Crane Report", &rows(), &[], &legend).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_report_pdf_handles_empty_rows() {
        let bytes = render_report_pdf("RSAC Sarus Crane Report", &[], &[], &[]).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_bad_chart_image_is_not_fatal() {
        let bad = ChartImage {
            title: "district".to_string(),
            png: vec![1, 2, 3],
        };
        let bytes = render_report_pdf("t", &rows(), &[bad], &[]).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_dashboard_pdf_renders() {
        let bytes = render_dashboard_pdf(&DashboardSummary::default()).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        let out = fit("a very long habitat description indeed", 17.0);
        assert!(out.chars().count() <= 10);
        assert!(out.ends_with('…'));
    }
}
