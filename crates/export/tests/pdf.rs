//! Integration tests for PDF export.
//!
//! Rendered bytes are parsed back with lopdf to check page structure and
//! the text drawn on the page.

use actreport_export::{export, DocumentRenderer, PageGeometry, PdfRenderer};
use actreport_report::{
    ActivityReport, ActivityType, ChecklistItem, Nature, PreviewDocument, PreviewOptions, Schedule,
};
use lopdf::Document;

fn create_test_report() -> ActivityReport {
    let mut report = ActivityReport::new();
    report.year1 = "24".to_string();
    report.year2 = "25".to_string();
    report.department = "Physics".to_string();
    report.activity_title = "Renewable Energy Workshop".to_string();
    report.coordinator_name = "A. Kumar".to_string();
    report.date = "2024-09-14".to_string();
    report.venue = "Seminar Hall".to_string();
    report.time = "10:30".to_string();
    report.nature = Nature::Indoor;
    report.activity_type = ActivityType::Academic;
    report.schedule = Schedule::Scheduled;
    report.amount = 1500;
    report.documentation.set(ChecklistItem::Notice, true);
    report.documentation.set(ChecklistItem::EventReport, true);
    report.teacher_name = "A. Kumar".to_string();
    report.teacher_date = "2024-09-15".to_string();
    report
}

fn render(report: &ActivityReport, renderer: &PdfRenderer) -> Vec<u8> {
    let document = PreviewDocument::resolve(report, PreviewOptions::default());
    renderer
        .render(&document, &PageGeometry::A4_96DPI)
        .expect("render should succeed")
}

fn page_text(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).expect("output should parse as PDF");
    let pages = doc.get_pages();
    let page_id = *pages.get(&1).expect("first page");
    let content = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&content).into_owned()
}

fn as_f32(object: &lopdf::Object) -> f32 {
    match object {
        lopdf::Object::Integer(i) => *i as f32,
        lopdf::Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

// =============================================================================
// Page Structure Tests
// =============================================================================

mod structure {
    use super::*;

    #[test]
    fn test_single_page() {
        let bytes = render(&create_test_report(), &PdfRenderer::new());
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_media_box_is_a4() {
        let bytes = render(&create_test_report(), &PdfRenderer::new());
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();

        assert_eq!(media_box.len(), 4);
        assert!((as_f32(&media_box[2]) - 595.5).abs() < 0.01);
        assert!((as_f32(&media_box[3]) - 842.25).abs() < 0.01);
    }

    #[test]
    fn test_empty_report_renders() {
        let bytes = render(&ActivityReport::new(), &PdfRenderer::new());
        let text = page_text(&bytes);
        assert!(text.contains("(ACTIVITY REPORT)"));
        assert!(text.contains("(Remark:)"));
    }

    #[test]
    fn test_overflowing_content_stays_on_one_page() {
        let mut report = create_test_report();
        report.outcomes = "Outcome text that keeps going. ".repeat(500);

        let bytes = render(&report, &PdfRenderer::new());
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}

// =============================================================================
// Content Tests
// =============================================================================

mod content {
    use super::*;

    #[test]
    fn test_header_and_year_line() {
        let text = page_text(&render(&create_test_report(), &PdfRenderer::new()));
        assert!(text.contains("(Year: 2024 - 2025)"));
        assert!(text.contains("Renewable Energy Workshop"));
    }

    #[test]
    fn test_documentation_only_checked_items() {
        let text = page_text(&render(&create_test_report(), &PdfRenderer::new()));
        assert!(text.contains("(1. Notice)"));
        assert!(text.contains("(2. Event Report)"));
        assert!(!text.contains("Attendance"));
    }

    #[test]
    fn test_signature_roles_present() {
        let text = page_text(&render(&create_test_report(), &PdfRenderer::new()));
        for role in [
            "NAME OF TEACHER",
            "COMMITTEE INCHARGE",
            "IQAC COORDINATOR",
            "IC PRINCIPAL",
        ] {
            assert!(text.contains(&format!("({role})")), "missing {role}");
        }
        assert!(text.contains("(15/09/2024)"));
    }

    #[test]
    fn test_date_is_formatted() {
        let text = page_text(&render(&create_test_report(), &PdfRenderer::new()));
        assert!(text.contains("Sat, 14/09/2024"));
    }
}

// =============================================================================
// Logo Tests
// =============================================================================

mod logo {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logo_is_embedded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbImage::from_pixel(40, 10, image::Rgb([200, 30, 30]))
            .save(&path)
            .unwrap();

        let renderer = PdfRenderer::with_logo_path(&path).unwrap();
        assert!(renderer.has_logo());

        let bytes = render(&create_test_report(), &renderer);
        let text = page_text(&bytes);
        assert!(text.contains("/Im1 Do"));

        let doc = Document::load_mem(&bytes).unwrap();
        let has_image = doc.objects.values().any(|object| {
            object
                .as_stream()
                .ok()
                .and_then(|s| s.dict.get(b"Subtype").ok())
                .and_then(|s| s.as_name().ok())
                == Some(b"Image".as_slice())
        });
        assert!(has_image);
    }

    #[test]
    fn test_missing_logo_fails() {
        let dir = tempdir().unwrap();
        let result = PdfRenderer::with_logo_path(&dir.path().join("missing.png"));
        assert!(result.is_err());
    }

    #[test]
    fn test_export_file_name() {
        let artifact = export(
            &PreviewDocument::resolve(&create_test_report(), PreviewOptions::default()),
            &PdfRenderer::new(),
            &PageGeometry::default(),
        )
        .unwrap();
        assert_eq!(artifact.file_name, "Activity_Report_24_25.pdf");
    }
}
