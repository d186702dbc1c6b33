use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;

use crate::config::Config;
use crate::store::schema::{EXPORT_VERSION, ExportData, ProgressData};
use crate::store::{PROGRESS_KEY, ProgressStore};

/// One pretty-printed JSON file per key under `base_dir`.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// The directory is created lazily on first save, so an unwritable
    /// location only surfaces as a failed save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: &Path, json: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating {}", self.base_dir.display()))?;
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Bundle the progress record and config into an export payload.
    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            citedr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            progress: self.load(PROGRESS_KEY).unwrap_or_default(),
        }
    }

    pub fn write_export(&self, config: &Config, path: &Path) -> Result<()> {
        let data = self.export_all(config);
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn read_export(path: &Path) -> Result<ExportData> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let data: ExportData = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(data)
    }

    /// Replace the stored progress record with the imported one.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.citedr_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.citedr_export_version,
                EXPORT_VERSION
            );
        }
        if data.progress.needs_reset() {
            bail!(
                "Unsupported progress schema: {}",
                data.progress.schema_version
            );
        }
        self.save(PROGRESS_KEY, &data.progress)
            .context("Import failed while writing progress")
    }
}

impl ProgressStore for JsonStore {
    fn load(&self, key: &str) -> Option<ProgressData> {
        let path = self.file_path(key);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable progress file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt progress file");
                None
            }
        }
    }

    fn save(&self, key: &str, data: &ProgressData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(&self.file_path(key), &json)
    }
}
