//! Single-page PDF renderer.
//!
//! Lays the preview out top to bottom on one fixed-size page using the
//! standard Times fonts. Content that runs past the bottom margin is
//! clipped; there is no pagination.

use crate::geometry::PageGeometry;
use crate::text::{text_width, win_ansi, wrap};
use crate::{DocumentRenderer, ExportError, Result};
use actreport_report::PreviewDocument;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::io::Write;
use std::path::Path;

const BODY_SIZE: f32 = 9.75;
const LABEL_SIZE: f32 = 9.0;
const HEADING_SIZE: f32 = 10.5;
const TITLE_SIZE: f32 = 13.5;
const LINE_GAP: f32 = 1.3;
const MARGIN_PX: f32 = 24.0;
const LOGO_MAX_HEIGHT_PX: f32 = 120.0;

#[derive(Default)]
pub struct PdfRenderer {
    logo: Option<RgbImage>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer that prints `logo` across the top of the page.
    pub fn with_logo(logo: RgbImage) -> Self {
        Self { logo: Some(logo) }
    }

    /// Load a PNG or JPEG header logo from disk.
    pub fn with_logo_path(path: &Path) -> Result<Self> {
        let logo = image::open(path)
            .map_err(|source| ExportError::Logo {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        tracing::debug!(
            "Loaded header logo {:?} ({}x{})",
            path,
            logo.width(),
            logo.height()
        );
        Ok(Self::with_logo(logo))
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &PreviewDocument, geometry: &PageGeometry) -> Result<Vec<u8>> {
        let mut page = PageWriter::new(*geometry);

        page.border();
        if let Some(logo) = &self.logo {
            page.logo(logo.width(), logo.height());
        }
        page.centered("ACTIVITY REPORT", TITLE_SIZE, true);
        page.centered(&document.year_line(), BODY_SIZE, true);
        page.rule();

        for (label, value) in document.header_rows() {
            page.field(label, value);
        }
        page.grid(&document.detail_rows(), 2);
        page.rule();

        page.centered("ACTIVITY DETAILS", HEADING_SIZE, true);
        for (label, value) in document.narrative_rows() {
            page.field(label, value);
        }
        page.rule();

        page.centered("DOCUMENTATION", HEADING_SIZE, true);
        for item in &document.documentation {
            page.paragraph(&format!("{}. {}", item.number, item.label), BODY_SIZE, false);
        }
        page.rule();

        page.grid(&document.footer_rows(), 2);
        page.signatures(document);
        page.field("Remark:", "");

        if page.overflowed {
            tracing::warn!("Report content overflows the page and was clipped");
        }

        let logo = self.logo.as_ref();
        let bytes = assemble(page, logo)?;
        Ok(bytes)
    }
}

/// Cursor-based writer for one page of content operations.
struct PageWriter {
    geometry: PageGeometry,
    ops: Vec<Operation>,
    y: f32,
    left: f32,
    right: f32,
    bottom: f32,
    overflowed: bool,
    logo_box: Option<[f32; 4]>,
}

impl PageWriter {
    fn new(geometry: PageGeometry) -> Self {
        let margin = geometry.px_to_pt(MARGIN_PX);
        Self {
            geometry,
            ops: Vec::new(),
            y: geometry.height_pt() - margin,
            left: margin,
            right: geometry.width_pt() - margin,
            bottom: margin,
            overflowed: false,
            logo_box: None,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn border(&mut self) {
        let inset = self.geometry.px_to_pt(MARGIN_PX / 2.0);
        self.ops.push(Operation::new("w", vec![real(0.75)]));
        self.ops.push(Operation::new(
            "re",
            vec![
                real(inset),
                real(inset),
                real(self.geometry.width_pt() - 2.0 * inset),
                real(self.geometry.height_pt() - 2.0 * inset),
            ],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Reserve space for the logo scaled to the content width.
    fn logo(&mut self, width_px: u32, height_px: u32) {
        if width_px == 0 || height_px == 0 {
            return;
        }
        let max_height = self.geometry.px_to_pt(LOGO_MAX_HEIGHT_PX);
        let mut w = self.width();
        let mut h = w * height_px as f32 / width_px as f32;
        if h > max_height {
            w *= max_height / h;
            h = max_height;
        }
        let x = self.left + (self.width() - w) / 2.0;
        self.y -= h;
        self.logo_box = Some([x, self.y, w, h]);
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![real(w), real(0.0), real(0.0), real(h), real(x), real(self.y)],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]));
        self.ops.push(Operation::new("Q", vec![]));
        self.y -= 6.0;
    }

    /// Advance to the next baseline; false once past the bottom margin.
    fn next_line(&mut self, size: f32) -> bool {
        self.y -= size * LINE_GAP;
        if self.y < self.bottom {
            self.overflowed = true;
            return false;
        }
        true
    }

    fn text_at(&mut self, x: f32, text: &str, size: f32, bold: bool) {
        if text.is_empty() {
            return;
        }
        let font = if bold { "F2" } else { "F1" };
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), real(size)],
        ));
        self.ops.push(Operation::new("Td", vec![real(x), real(self.y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool) {
        if !self.next_line(size) {
            return;
        }
        let x = self.left + (self.width() - text_width(text, size, bold)) / 2.0;
        self.text_at(x.max(self.left), text, size, bold);
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool) {
        let width = self.width();
        for line in wrap(text, size, bold, width) {
            if !self.next_line(size) {
                return;
            }
            let left = self.left;
            self.text_at(left, &line, size, bold);
        }
    }

    /// Bold label, then the value wrapped underneath it.
    fn field(&mut self, label: &str, value: &str) {
        self.paragraph(label, LABEL_SIZE, true);
        if !value.trim().is_empty() {
            self.paragraph(value, BODY_SIZE, false);
        }
        self.y -= 2.0;
    }

    /// Label/value pairs laid out in `columns` equal columns, one pair per
    /// cell, `label value` on a single wrapped line.
    fn grid(&mut self, rows: &[(&str, &str)], columns: usize) {
        let columns = columns.max(1);
        let gap = 12.0;
        let cell = (self.width() - gap * (columns - 1) as f32) / columns as f32;

        for chunk in rows.chunks(columns) {
            let wrapped: Vec<Vec<String>> = chunk
                .iter()
                .map(|(label, value)| wrap(&format!("{label} {value}"), BODY_SIZE, false, cell))
                .collect();
            let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
            for line_idx in 0..height {
                if !self.next_line(BODY_SIZE) {
                    return;
                }
                for (col, lines) in wrapped.iter().enumerate() {
                    if let Some(line) = lines.get(line_idx) {
                        let x = self.left + col as f32 * (cell + gap);
                        self.text_at(x, line, BODY_SIZE, false);
                    }
                }
            }
        }
        self.y -= 2.0;
    }

    fn signatures(&mut self, document: &PreviewDocument) {
        let count = document.signatures.len().max(1);
        let cell = self.width() / count as f32;
        self.y -= 18.0;

        for row in 0..3 {
            if !self.next_line(LABEL_SIZE) {
                return;
            }
            for (idx, signature) in document.signatures.iter().enumerate() {
                let (text, bold) = match row {
                    0 => (signature.role, true),
                    1 => (signature.name.as_str(), false),
                    _ => (signature.date.as_str(), false),
                };
                let x = self.left
                    + idx as f32 * cell
                    + (cell - text_width(text, LABEL_SIZE, bold)).max(0.0) / 2.0;
                self.text_at(x, text, LABEL_SIZE, bold);
            }
        }
        self.y -= 6.0;
    }

    fn rule(&mut self) {
        self.y -= 4.0;
        if self.y < self.bottom {
            self.overflowed = true;
            return;
        }
        self.ops.push(Operation::new("w", vec![real(0.5)]));
        self.ops.push(Operation::new("m", vec![real(self.left), real(self.y)]));
        self.ops.push(Operation::new("l", vec![real(self.right), real(self.y)]));
        self.ops.push(Operation::new("S", vec![]));
    }
}

fn real(value: f32) -> Object {
    value.into()
}

/// Build the PDF object graph around the page content.
fn assemble(page: PageWriter, logo: Option<&RgbImage>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    };
    if let (Some(logo), Some(_)) = (logo, page.logo_box) {
        let image_id = doc.add_object(image_stream(logo)?);
        resources.set("XObject", dictionary! { "Im1" => image_id });
    }
    let resources_id = doc.add_object(resources);

    let content = Content {
        operations: page.ops,
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let media_box: Vec<Object> = vec![
        real(0.0),
        real(0.0),
        real(page.geometry.width_pt()),
        real(page.geometry.height_pt()),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// RGB image XObject, Flate-compressed.
fn image_stream(logo: &RgbImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(logo.as_raw())?;
    let data = encoder.finish()?;

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => logo.width() as i64,
            "Height" => logo.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    ))
}
