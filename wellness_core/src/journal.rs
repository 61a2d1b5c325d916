//! Assessment journal.
//!
//! Every assessment the CLI computes is appended as one JSON object per line.
//! The file is shared between concurrent invocations: appends take an
//! exclusive lock and emit the whole line in a single write, scans take a
//! shared lock. A scan never fails because of a damaged line. Lines left
//! truncated by a crash, or holding bytes that are not UTF-8, are counted
//! and skipped.

use crate::store::normalize_email;
use crate::{AssessmentRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for computed assessments
pub trait AssessmentSink {
    fn append(&mut self, record: &AssessmentRecord) -> Result<()>;
}

/// Outcome of reading a journal
#[derive(Debug, Default)]
pub struct JournalScan {
    /// Records in append order
    pub records: Vec<AssessmentRecord>,
    /// Non-blank lines that did not decode as a record
    pub skipped: usize,
}

/// JSON Lines journal on the local filesystem
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every decodable record. A missing journal is empty.
    pub fn scan(&self) -> Result<JournalScan> {
        scan_journal(&self.path, None)
    }

    /// Read the records logged for one profile
    ///
    /// `email` is normalized the same way the profile store keys it.
    /// Anonymous assessments (`assess` without a profile) never match.
    pub fn scan_for(&self, email: &str) -> Result<JournalScan> {
        let key = normalize_email(email)?;
        scan_journal(&self.path, Some(&key))
    }
}

impl AssessmentSink for JsonlJournal {
    fn append(&mut self, record: &AssessmentRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let written = file.write_all(&line).and_then(|()| file.sync_data());
        file.unlock()?;
        written?;

        tracing::debug!(
            "Journaled assessment {} (score {}) for {}",
            record.id,
            record.assessment.health_score,
            record.email.as_deref().unwrap_or("anonymous")
        );
        Ok(())
    }
}

/// All decodable records in the journal at `path`
pub fn read_records(path: &Path) -> Result<Vec<AssessmentRecord>> {
    Ok(JsonlJournal::new(path).scan()?.records)
}

fn scan_journal(path: &Path, email: Option<&str>) -> Result<JournalScan> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(JournalScan::default()),
        Err(e) => return Err(e.into()),
    };

    file.lock_shared()?;
    let scan = scan_lines(BufReader::new(&file), email);
    file.unlock()?;
    let scan = scan?;

    if scan.skipped > 0 {
        tracing::warn!(
            "Journal {:?}: {} unreadable lines skipped",
            path,
            scan.skipped
        );
    }
    tracing::debug!("Journal {:?}: {} records", path, scan.records.len());
    Ok(scan)
}

fn scan_lines(mut reader: impl BufRead, email: Option<&str>) -> Result<JournalScan> {
    let mut scan = JournalScan::default();
    let mut line = Vec::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_no += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<AssessmentRecord>(&line) {
            Ok(record) => {
                if email.map_or(true, |key| record.email.as_deref() == Some(key)) {
                    scan.records.push(record);
                }
            }
            Err(e) => {
                tracing::debug!("Journal line {} is not a record: {}", line_no, e);
                scan.skipped += 1;
            }
        }
    }

    Ok(scan)
}
