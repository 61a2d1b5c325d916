//! CSV export of the assessment journal.

use crate::journal::JsonlJournal;
use crate::{AssessmentRecord, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    email: Option<String>,
    assessed_at: String,
    age_years: u32,
    height_cm: f64,
    weight_kg: f64,
    sleep_hours: f64,
    water_glasses: u32,
    activity_level: String,
    bmi: f64,
    bmi_category: String,
    health_score: u8,
}

impl From<&AssessmentRecord> for CsvRow {
    fn from(record: &AssessmentRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            email: record.email.clone(),
            assessed_at: record.assessed_at.to_rfc3339(),
            age_years: record.profile.age_years,
            height_cm: record.profile.height_cm,
            weight_kg: record.profile.weight_kg,
            sleep_hours: record.profile.sleep_hours,
            water_glasses: record.profile.water_glasses,
            activity_level: record.profile.activity_level.to_string(),
            bmi: record.assessment.bmi,
            bmi_category: record.assessment.bmi_category.to_string(),
            health_score: record.assessment.health_score,
        }
    }
}

/// Rows written by an export and journal lines that could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub skipped: usize,
}

/// Write every journal record to a CSV file, replacing it
///
/// Returns the number of rows written.
pub fn export_csv(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    let summary = export_journal(&JsonlJournal::new(journal_path), csv_path, None)?;
    Ok(summary.rows)
}

/// Write journal records to a CSV file, optionally only those for `email`
///
/// The CSV is synced to disk before returning; the journal itself is left
/// untouched. Unreadable journal lines are reported in the summary.
pub fn export_journal(
    journal: &JsonlJournal,
    csv_path: &Path,
    email: Option<&str>,
) -> Result<ExportSummary> {
    let scan = match email {
        Some(email) => journal.scan_for(email)?,
        None => journal.scan()?,
    };

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    for record in &scan.records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!(
        "Exported {} assessments to {:?} ({} journal lines skipped)",
        scan.records.len(),
        csv_path,
        scan.skipped
    );
    Ok(ExportSummary {
        rows: scan.records.len(),
        skipped: scan.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assess;
    use crate::journal::AssessmentSink;
    use crate::{ActivityLevel, HealthProfile};

    fn create_test_record(weight_kg: f64) -> AssessmentRecord {
        let profile = HealthProfile {
            age_years: 25,
            height_cm: 175.0,
            weight_kg,
            sleep_hours: 8.0,
            water_glasses: 9,
            activity_level: ActivityLevel::Active,
        };
        let assessment = assess(&profile).unwrap();
        AssessmentRecord::new(Some("a@b.com".into()), profile, assessment)
    }

    fn header(csv_path: &Path) -> Vec<String> {
        let mut reader = csv::Reader::from_path(csv_path).unwrap();
        reader.headers().unwrap().iter().map(String::from).collect()
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("assessments.jsonl");
        let csv_path = temp_dir.path().join("out").join("assessments.csv");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_record(70.0)).unwrap();
        journal.append(&create_test_record(98.0)).unwrap();

        let count = export_csv(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("id,email,assessed_at,"));
        assert!(contents.contains("22.86,Normal,100"));
        assert!(contents.contains("Obese Class I"));

        // Journal is not consumed by export
        assert!(journal_path.exists());
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("assessments.jsonl");
        let csv_path = temp_dir.path().join("assessments.csv");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_record(70.0)).unwrap();
        export_csv(&journal_path, &csv_path).unwrap();
        export_csv(&journal_path, &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 1);
    }

    #[test]
    fn test_export_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("missing.jsonl");
        let csv_path = temp_dir.path().join("assessments.csv");

        let count = export_csv(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_export_column_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("assessments.jsonl");
        let csv_path = temp_dir.path().join("assessments.csv");

        JsonlJournal::new(&journal_path)
            .append(&create_test_record(70.0))
            .unwrap();
        export_csv(&journal_path, &csv_path).unwrap();

        assert_eq!(
            header(&csv_path),
            [
                "id",
                "email",
                "assessed_at",
                "age_years",
                "height_cm",
                "weight_kg",
                "sleep_hours",
                "water_glasses",
                "activity_level",
                "bmi",
                "bmi_category",
                "health_score",
            ]
        );
    }

    #[test]
    fn test_export_survives_unreadable_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("assessments.jsonl");
        let csv_path = temp_dir.path().join("assessments.csv");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_record(70.0)).unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&journal_path)
                .unwrap();
            file.write_all(b"\xff\xfe garbage\n").unwrap();
        }
        journal.append(&create_test_record(98.0)).unwrap();

        let summary = export_journal(&journal, &csv_path, None).unwrap();
        assert_eq!(summary, ExportSummary { rows: 2, skipped: 1 });
        assert_eq!(export_csv(&journal_path, &csv_path).unwrap(), 2);
    }

    #[test]
    fn test_export_for_one_email() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("assessments.jsonl");
        let csv_path = temp_dir.path().join("assessments.csv");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_record(70.0)).unwrap();
        let mut other = create_test_record(98.0);
        other.email = Some("c@d.org".into());
        journal.append(&other).unwrap();

        let summary = export_journal(&journal, &csv_path, Some("C@D.org")).unwrap();
        assert_eq!(summary.rows, 1);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.contains("c@d.org"));
        assert!(!contents.contains("a@b.com"));
    }
}
