//! The exported plan report: summary block, summary table, and one detail
//! section per action, as a paginated PDF.

pub mod format;
pub mod layout;
pub mod pdf;

use crate::action::MarketingAction;
use crate::error::Result;
use crate::summary::summarize;
use std::path::Path;

pub use layout::{Document, ReportOptions};

/// Lay out `actions` sorted by start date (ties keep their order).
pub fn build(actions: &[MarketingAction], options: &ReportOptions) -> Document {
    let mut sorted: Vec<&MarketingAction> = actions.iter().collect();
    sorted.sort_by_key(|a| a.start);
    let summary = summarize(sorted.iter().copied());
    layout::layout(&sorted, &summary, options)
}

pub fn render_pdf(actions: &[MarketingAction], options: &ReportOptions) -> Result<Vec<u8>> {
    pdf::write(&build(actions, options))
}

/// Render and write the report to `path`. Returns the number of pages.
pub fn export(actions: &[MarketingAction], options: &ReportOptions, path: &Path) -> Result<usize> {
    let doc = build(actions, options);
    let bytes = pdf::write(&doc)?;
    crate::io::atomic_write(path, &bytes)?;
    tracing::info!(path = %path.display(), pages = doc.pages.len(), actions = actions.len(), "exported report");
    Ok(doc.pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn options() -> ReportOptions {
        ReportOptions {
            title: "Plano".to_string(),
            generated_on: date(1, 2),
        }
    }

    #[test]
    fn detail_sections_follow_start_date() {
        let late = MarketingAction::new("Natal", date(12, 1));
        let early = MarketingAction::new("Carnaval", date(2, 1));
        let doc = build(&[late, early], &options());
        let titles: Vec<&str> = doc.pages[1..]
            .iter()
            .flat_map(|p| p.texts())
            .filter(|t| *t == "Natal" || *t == "Carnaval")
            .collect();
        assert_eq!(titles, ["Carnaval", "Natal"]);
    }

    #[test]
    fn export_writes_pdf_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plano-marketing-anual.pdf");
        let pages = export(&[MarketingAction::new("Verão", date(1, 5))], &options(), &path).unwrap();
        assert_eq!(pages, 2);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn render_empty_plan() {
        let bytes = render_pdf(&[], &options()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
