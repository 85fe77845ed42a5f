//! Single-page export of a resolved report preview.
//!
//! A [`DocumentRenderer`] turns a [`PreviewDocument`] into file bytes laid
//! out on a fixed [`PageGeometry`]. [`export`] pairs those bytes with the
//! deterministic file name for the report's academic year.

mod geometry;
mod naming;
mod pdf;
mod text;

pub use geometry::PageGeometry;
pub use naming::export_file_name;
pub use pdf::PdfRenderer;

use actreport_report::PreviewDocument;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to load logo {path:?}: {source}")]
    Logo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Turns a resolved preview into the bytes of one output file.
pub trait DocumentRenderer {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &PreviewDocument, geometry: &PageGeometry) -> Result<Vec<u8>>;
}

impl<R: DocumentRenderer + ?Sized> DocumentRenderer for &R {
    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn render(&self, document: &PreviewDocument, geometry: &PageGeometry) -> Result<Vec<u8>> {
        (**self).render(document, geometry)
    }
}

/// Plain-text rendering of the preview, one field per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &PreviewDocument, _geometry: &PageGeometry) -> Result<Vec<u8>> {
        Ok(document.to_string().into_bytes())
    }
}

/// A rendered file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write into `dir` under the artifact's file name, replacing any
    /// existing file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Render `document` and name the result after its academic year.
pub fn export<R: DocumentRenderer + ?Sized>(
    document: &PreviewDocument,
    renderer: &R,
    geometry: &PageGeometry,
) -> Result<ExportArtifact> {
    let file_name = export_file_name(&document.year1, &document.year2, renderer.extension());
    tracing::debug!("Rendering {} at {}x{} px", file_name, geometry.width_px, geometry.height_px);

    let bytes = renderer.render(document, geometry)?;
    Ok(ExportArtifact { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actreport_report::{ActivityReport, PreviewOptions};

    fn document() -> PreviewDocument {
        let mut report = ActivityReport::new();
        report.year1 = "24".to_string();
        report.year2 = "25".to_string();
        report.activity_title = "Science Exhibition".to_string();
        PreviewDocument::resolve(&report, PreviewOptions::default())
    }

    #[test]
    fn test_export_names_artifact_by_year() {
        let artifact = export(&document(), &TextRenderer, &PageGeometry::default()).unwrap();
        assert_eq!(artifact.file_name, "Activity_Report_24_25.txt");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("ACTIVITY REPORT"));
        assert!(text.contains("Science Exhibition"));
    }

    #[test]
    fn test_export_through_trait_object() {
        let renderer: Box<dyn DocumentRenderer> = Box::new(PdfRenderer::new());
        let artifact = export(&document(), renderer.as_ref(), &PageGeometry::default()).unwrap();
        assert_eq!(artifact.file_name, "Activity_Report_24_25.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_write_to_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let artifact = ExportArtifact {
            file_name: "Activity_Report_24_25.txt".to_string(),
            bytes: b"hello".to_vec(),
        };

        let path = artifact.write_to(&target).unwrap();
        assert_eq!(path, target.join("Activity_Report_24_25.txt"));
        assert_eq!(std::fs::read(path).unwrap(), b"hello");
    }
}
