//! Profile persistence keyed by email, with file locking.
//!
//! All profiles live in a single JSON document. Reads take a shared lock;
//! read-modify-write cycles hold an exclusive lock on a sidecar `.lock` file
//! and replace the document atomically through a temp file.

use crate::config::ValidationConfig;
use crate::engine::assess;
use crate::validate::validate;
use crate::{Error, HealthProfile, ProfilePatch, Result, StoredProfile};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for user profiles and their latest assessment
pub trait ProfileStore {
    /// Look up a profile by email
    fn get(&self, email: &str) -> Result<Option<StoredProfile>>;

    /// Insert a profile or replace the existing one, reassessing it
    fn upsert(&mut self, email: &str, profile: HealthProfile) -> Result<StoredProfile>;

    /// Merge supplied fields into an existing profile
    ///
    /// The assessment is recomputed only when a field that feeds it changed.
    fn patch(&mut self, email: &str, patch: &ProfilePatch) -> Result<StoredProfile>;
}

/// On-disk layout of the profile document
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    profiles: BTreeMap<String, StoredProfile>,
}

/// JSON-file-backed profile store
pub struct JsonProfileStore {
    path: PathBuf,
    validation: ValidationConfig,
}

impl JsonProfileStore {
    /// Create a store for the given path using the given validation rules
    pub fn new(path: impl Into<PathBuf>, validation: ValidationConfig) -> Self {
        Self {
            path: path.into(),
            validation,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Read the whole document under a shared lock
    fn load(&self) -> Result<ProfileDocument> {
        if !self.path.exists() {
            tracing::debug!("No profile store at {:?}, starting empty", self.path);
            return Ok(ProfileDocument::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("Failed to parse profile store {:?}: {}", self.path, e);
            Error::Store(format!("{} is corrupted: {}", self.path.display(), e))
        })
    }

    /// Atomically replace the document
    fn save(&self, document: &ProfileDocument) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(document)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            "Saved {} profiles to {:?}",
            document.profiles.len(),
            self.path
        );
        Ok(())
    }

    /// Run a load-modify-save cycle under an exclusive lock
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ProfileDocument) -> Result<T>,
    {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.path.with_extension("lock"))?;
        lock_file.lock_exclusive()?;

        let result = self.load().and_then(|mut document| {
            let value = f(&mut document)?;
            self.save(&document)?;
            Ok(value)
        });

        lock_file.unlock()?;
        result
    }
}

impl ProfileStore for JsonProfileStore {
    fn get(&self, email: &str) -> Result<Option<StoredProfile>> {
        let key = normalize_email(email)?;
        Ok(self.load()?.profiles.remove(&key))
    }

    fn upsert(&mut self, email: &str, profile: HealthProfile) -> Result<StoredProfile> {
        let key = normalize_email(email)?;
        validate(&profile, &self.validation)?;
        let assessment = assess(&profile)?;

        let stored = StoredProfile {
            email: key.clone(),
            profile,
            assessment,
            updated_at: Utc::now(),
        };

        self.update(|document| {
            let replaced = document.profiles.insert(key.clone(), stored.clone());
            tracing::info!(
                "{} profile for {}",
                if replaced.is_some() { "Updated" } else { "Created" },
                key
            );
            Ok(stored.clone())
        })
    }

    fn patch(&mut self, email: &str, patch: &ProfilePatch) -> Result<StoredProfile> {
        let key = normalize_email(email)?;
        let validation = &self.validation;

        self.update(|document| {
            let existing = document
                .profiles
                .get_mut(&key)
                .ok_or_else(|| Error::NotFound(format!("no profile for {}", key)))?;

            if patch.is_empty() {
                tracing::debug!("Empty patch for {}, nothing to do", key);
                return Ok(existing.clone());
            }

            let merged = patch.apply_to(&existing.profile);
            validate(&merged, validation)?;

            if patch.affects_assessment() {
                existing.assessment = assess(&merged)?;
                tracing::debug!("Reassessed {} after patch", key);
            }
            existing.profile = merged;
            existing.updated_at = Utc::now();

            tracing::info!("Patched profile for {}", key);
            Ok(existing.clone())
        })
    }
}

/// Normalize an email into a store key (trimmed, lower-cased)
pub fn normalize_email(email: &str) -> Result<String> {
    let key = email.trim().to_lowercase();
    match key.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(key),
        _ => Err(Error::InvalidInput { field: "email" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActivityLevel;

    fn test_profile() -> HealthProfile {
        HealthProfile {
            age_years: 30,
            height_cm: 175.0,
            weight_kg: 70.0,
            sleep_hours: 8.0,
            water_glasses: 9,
            activity_level: ActivityLevel::Active,
        }
    }

    fn test_store(dir: &Path) -> JsonProfileStore {
        JsonProfileStore::new(dir.join("profiles.json"), ValidationConfig::default())
    }

    #[test]
    fn test_upsert_and_get_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());

        let stored = store.upsert("Jane@Example.com ", test_profile()).unwrap();
        assert_eq!(stored.email, "jane@example.com");
        assert_eq!(stored.assessment.health_score, 100);

        let loaded = store.get("jane@example.com").unwrap().unwrap();
        assert_eq!(loaded.profile, test_profile());
        assert_eq!(loaded.assessment, stored.assessment);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = test_store(temp_dir.path());

        assert!(store.get("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());

        store.upsert("a@b.com", test_profile()).unwrap();
        let heavier = HealthProfile {
            weight_kg: 98.0,
            ..test_profile()
        };
        store.upsert("A@B.com", heavier).unwrap();

        let loaded = store.get("a@b.com").unwrap().unwrap();
        assert_eq!(loaded.profile.weight_kg, 98.0);
        assert_eq!(loaded.assessment.bmi, 32.0);
    }

    #[test]
    fn test_upsert_rejects_invalid_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());

        let bad = HealthProfile {
            height_cm: 0.0,
            ..test_profile()
        };
        let result = store.upsert("a@b.com", bad);
        assert!(matches!(
            result,
            Err(Error::OutOfRange {
                field: "heightCm",
                ..
            })
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_patch_merges_and_reassesses() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());
        store.upsert("a@b.com", test_profile()).unwrap();

        let patch = ProfilePatch {
            sleep_hours: Some(5.0),
            ..Default::default()
        };
        let patched = store.patch("a@b.com", &patch).unwrap();

        assert_eq!(patched.profile.sleep_hours, 5.0);
        assert_eq!(patched.profile.weight_kg, 70.0);
        assert_eq!(patched.assessment.health_score, 80);
    }

    #[test]
    fn test_age_only_patch_keeps_assessment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());
        let original = store.upsert("a@b.com", test_profile()).unwrap();

        let patch = ProfilePatch {
            age_years: Some(45),
            ..Default::default()
        };
        let patched = store.patch("a@b.com", &patch).unwrap();

        assert_eq!(patched.profile.age_years, 45);
        assert_eq!(patched.assessment, original.assessment);
    }

    #[test]
    fn test_patch_validates_merged_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());
        store.upsert("a@b.com", test_profile()).unwrap();

        let patch = ProfilePatch {
            water_glasses: Some(40),
            ..Default::default()
        };
        assert!(matches!(
            store.patch("a@b.com", &patch),
            Err(Error::OutOfRange {
                field: "waterGlasses",
                ..
            })
        ));

        let loaded = store.get("a@b.com").unwrap().unwrap();
        assert_eq!(loaded.profile.water_glasses, 9);
    }

    #[test]
    fn test_patch_missing_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());

        let result = store.patch("ghost@example.com", &ProfilePatch::default());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_corrupted_store_is_not_overwritten() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());
        std::fs::write(store.path(), "{ invalid json }").unwrap();

        assert!(matches!(
            store.upsert("a@b.com", test_profile()),
            Err(Error::Store(_))
        ));
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "{ invalid json }");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Foo@Bar.COM ").unwrap(), "foo@bar.com");
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(Error::InvalidInput { field: "email" })
        ));
        assert!(normalize_email("@bar.com").is_err());
        assert!(normalize_email("foo@").is_err());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = test_store(temp_dir.path());
        store.upsert("a@b.com", test_profile()).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "profiles.json" && name != "profiles.lock")
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }
}
