// Local export of generated assets

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AssetCategory;

pub struct AssetExporter {
    export_dir: PathBuf,
}

impl AssetExporter {
    pub const fn new(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    /// Configured directory, else the user's download directory, else the working directory.
    pub fn from_config(export_dir: Option<&Path>) -> Self {
        let dir = export_dir
            .map(Path::to_path_buf)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn export(&self, category: AssetCategory, topic: &str, data_uri: &str) -> Result<PathBuf> {
        let bytes = decode_data_uri(data_uri)?;
        fs::create_dir_all(&self.export_dir).context("Failed to create export directory")?;

        let path = self.export_dir.join(export_file_name(category, topic));
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), %category, "asset exported");
        Ok(path)
    }
}

/// `<label>-<topic>.png`, with every run of whitespace or path separators in the topic
/// turned into one hyphen, so the name never leaves the export directory.
pub fn export_file_name(category: AssetCategory, topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut in_whitespace = false;
    for c in topic.chars() {
        if c.is_whitespace() || is_path_separator(c) {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    format!("{}-{slug}.png", category.label())
}

const fn is_path_separator(c: char) -> bool {
    matches!(c, '/' | '\\') || c == std::path::MAIN_SEPARATOR
}

pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let payload = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| anyhow::anyhow!("Not a base64 data URI"))?;

    BASE64
        .decode(payload.trim())
        .context("Image base64 decode failed")
}
