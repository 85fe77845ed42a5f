//! Subcommand handlers. Each one drives a [`ReportSession`] and prints
//! its result to stdout.

use actreport_export::{DocumentRenderer, PdfRenderer, TextRenderer};
use actreport_report::{ActivityReport, ChecklistItem, PreviewDocument, ReportField};
use actreport_session::{ExportTarget, ReportSession};
use actreport_storage::BlobStore;
use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use std::path::Path;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pdf,
    Text,
}

/// Field edits and checklist toggles collected from the command line.
#[derive(Debug, Default)]
pub struct Edits {
    pub set: Vec<String>,
    pub check: Vec<String>,
    pub uncheck: Vec<String>,
}

impl Edits {
    fn apply(&self, session: &mut ReportSession<impl BlobStore>) -> anyhow::Result<()> {
        for assignment in &self.set {
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected field=value, got {assignment:?}"))?;
            let field: ReportField = key.trim().parse()?;
            session.set_field(field, value)?;
        }
        for item in &self.check {
            session.set_documentation(parse_item(item)?, true)?;
        }
        for item in &self.uncheck {
            session.set_documentation(parse_item(item)?, false)?;
        }
        Ok(())
    }
}

fn parse_item(input: &str) -> anyhow::Result<ChecklistItem> {
    ChecklistItem::parse(input)
        .ok_or_else(|| anyhow!("Unknown documentation item {input:?} (see `actreport fields`)"))
}

pub fn list(session: &ReportSession<impl BlobStore>) {
    if session.reports().is_empty() {
        println!("No saved reports.");
        return;
    }
    println!(
        "{:<15} {:<12} {:<10} {:<24} {:<16} TITLE",
        "ID", "DATE", "YEAR", "DEPARTMENT", "SAVED"
    );
    for report in session.reports() {
        println!("{}", list_row(report));
    }
}

fn list_row(report: &ActivityReport) -> String {
    format!(
        "{:<15} {:<12} {:<10} {:<24} {:<16} {}",
        report.id,
        report.date,
        format!("{}-{}", report.year1, report.year2),
        report.department,
        saved_at(report.timestamp),
        report.display_title()
    )
}

/// Local time of a millisecond save stamp, or "-" if never saved.
fn saved_at(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "-".to_string();
    }
    match DateTime::from_timestamp_millis(timestamp) {
        Some(utc) => utc.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn show(session: &ReportSession<impl BlobStore>, id: &str, json: bool) -> anyhow::Result<()> {
    let report = session
        .store()
        .get(id)
        .ok_or_else(|| anyhow!("No saved report with id {id}"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", PreviewDocument::resolve(report, session.options()));
    }
    Ok(())
}

pub fn new(session: &mut ReportSession<impl BlobStore>, edits: &Edits) -> anyhow::Result<()> {
    session.clear();
    edits.apply(session)?;
    let saved = session.save()?;
    println!("Saved report {}", saved.id);
    Ok(())
}

pub fn edit(
    session: &mut ReportSession<impl BlobStore>,
    id: &str,
    edits: &Edits,
) -> anyhow::Result<()> {
    session.load_for_edit(id)?;
    edits.apply(session)?;
    let saved = session.save()?;
    println!("Updated report {}", saved.id);
    Ok(())
}

/// Insert every record in `path` as a new report. The file holds either
/// one report object or an array of them.
pub fn import(session: &mut ReportSession<impl BlobStore>, path: &Path) -> anyhow::Result<()> {
    let reports = read_reports(path)?;
    for report in reports {
        session.clear();
        *session.working_mut() = report;
        let saved = session.save()?;
        println!("Imported {} as {}", saved.display_title(), saved.id);
    }
    Ok(())
}

pub fn delete(session: &mut ReportSession<impl BlobStore>, id: &str) -> anyhow::Result<()> {
    if session.store().get(id).is_none() {
        bail!("No saved report with id {id}");
    }
    let remaining = session.delete(id);
    println!("Deleted report {id} ({} left)", remaining.len());
    Ok(())
}

pub fn export(
    session: &mut ReportSession<impl BlobStore>,
    config: &AppConfig,
    target: ExportTarget,
    format: Format,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let renderer: Box<dyn DocumentRenderer> = match format {
        Format::Pdf => match &config.logo_path {
            Some(logo) => Box::new(PdfRenderer::with_logo_path(logo)?),
            None => Box::new(PdfRenderer::new()),
        },
        Format::Text => Box::new(TextRenderer),
    };

    let artifact = session.export(target, renderer.as_ref())?;
    let dir = out.map(Path::to_path_buf).unwrap_or_else(|| config.export_dir());
    let path = artifact.write_to(&dir)?;
    println!("{}", path.display());
    Ok(())
}

/// Load a report file into the working record without saving it.
pub fn load_current(
    session: &mut ReportSession<impl BlobStore>,
    path: &Path,
) -> anyhow::Result<()> {
    let mut reports = read_reports(path)?;
    if reports.len() != 1 {
        bail!("{} holds {} reports, expected exactly one", path.display(), reports.len());
    }
    *session.working_mut() = reports.remove(0);
    Ok(())
}

pub fn fields() {
    println!("Fields (use with --set key=value):");
    for field in ReportField::ALL {
        println!("  {:<22} {}", field.key(), field.hint());
    }
    println!();
    println!("Documentation items (use with --check / --uncheck, by number or label):");
    for (idx, item) in ChecklistItem::ALL.iter().enumerate() {
        println!("  {:>2}. {}", idx + 1, item.label());
    }
}

fn read_reports(path: &Path) -> anyhow::Result<Vec<ActivityReport>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let reports = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ActivityReport>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    tracing::debug!("Read {} report(s) from {}", reports.len(), path.display());
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actreport_storage::{InMemoryBlobStore, ReportStore};
    use tempfile::tempdir;

    fn session() -> ReportSession<InMemoryBlobStore> {
        ReportSession::detached(ReportStore::open(InMemoryBlobStore::new()))
    }

    #[test]
    fn test_edits_apply_fields_and_checklist() {
        let mut session = session();
        let edits = Edits {
            set: vec!["activityTitle=Field Trip".to_string(), "amount=400".to_string()],
            check: vec!["3".to_string(), "publicity".to_string()],
            uncheck: vec![],
        };
        new(&mut session, &edits).unwrap();

        let saved = &session.reports()[0];
        assert_eq!(saved.activity_title, "Field Trip");
        assert_eq!(saved.amount, 400);
        assert!(saved.documentation.is_checked(ChecklistItem::Notice));
        assert!(saved.documentation.is_checked(ChecklistItem::Publicity));
    }

    #[test]
    fn test_edits_reject_bad_input() {
        let mut session = session();
        let missing_eq = Edits {
            set: vec!["activityTitle".to_string()],
            ..Edits::default()
        };
        assert!(new(&mut session, &missing_eq).is_err());

        let unknown_item = Edits {
            check: vec!["Banner".to_string()],
            ..Edits::default()
        };
        assert!(new(&mut session, &unknown_item).is_err());
        assert!(session.reports().is_empty());
    }

    #[test]
    fn test_import_array_and_single_object() {
        let dir = tempdir().unwrap();
        let many = dir.path().join("many.json");
        std::fs::write(
            &many,
            r#"[{"id": "1", "activityTitle": "One"}, {"id": "2", "activityTitle": "Two"}]"#,
        )
        .unwrap();
        let one = dir.path().join("one.json");
        std::fs::write(&one, r#"{"activityTitle": "Three", "nature": "Online"}"#).unwrap();

        let mut session = session();
        import(&mut session, &many).unwrap();
        import(&mut session, &one).unwrap();

        let titles: Vec<_> = session
            .reports()
            .iter()
            .map(|r| r.activity_title.as_str())
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert!(session.reports().iter().all(|r| r.id != "1" && r.id != "2"));
    }

    #[test]
    fn test_list_row_shows_department_and_save_time() {
        let mut session = session();
        let edits = Edits {
            set: vec![
                "activityTitle=Science Fair".to_string(),
                "department=Physics".to_string(),
            ],
            ..Edits::default()
        };
        new(&mut session, &edits).unwrap();

        let saved = &session.reports()[0];
        let row = list_row(saved);
        assert!(row.contains("Physics"));
        assert!(row.contains("Science Fair"));
        assert!(row.contains(&saved_at(saved.timestamp)));
    }

    #[test]
    fn test_saved_at_formats_stamp() {
        assert_eq!(saved_at(0), "-");
        let text = saved_at(1_726_300_000_000);
        assert_eq!(text.len(), 16);
        assert_eq!(&text[2..3], "/");
        assert_eq!(&text[5..6], "/");
        assert_eq!(&text[6..10], "2024");
    }

    #[test]
    fn test_delete_unknown_id_is_an_error() {
        let mut session = session();
        assert!(delete(&mut session, "nope").is_err());
    }

    #[test]
    fn test_export_current_file_as_text() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("draft.json");
        std::fs::write(&input, r#"{"year1": "24", "year2": "25", "activityTitle": "Draft"}"#)
            .unwrap();

        let mut session = session();
        load_current(&mut session, &input).unwrap();
        let out = dir.path().join("out");
        export(
            &mut session,
            &AppConfig::default(),
            ExportTarget::Current,
            Format::Text,
            Some(&out),
        )
        .unwrap();

        let written = std::fs::read_to_string(out.join("Activity_Report_24_25.txt")).unwrap();
        assert!(written.contains("Draft"));
        assert!(session.reports().is_empty());
    }
}
