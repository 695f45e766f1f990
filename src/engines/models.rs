//! On-disk cache for downloaded model files

use crate::error::OcrError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    /// `<user cache dir>/ocr-bench/<subdir>`
    pub fn user(subdir: &str) -> Self {
        Self::at(
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ocr-bench")
                .join(subdir),
        )
    }

    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `filename` in the cache, downloading it from `url` first if
    /// it is not there yet
    pub fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, OcrError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OcrError::InitializationError(format!(
                "Failed to create cache directory {:?}: {}",
                self.dir, e
            ))
        })?;

        let path = self.dir.join(filename);
        if path.exists() {
            tracing::info!("Using cached {} from {:?}", filename, path);
            return Ok(path);
        }

        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download(url, &path)?;
        tracing::info!("Downloaded {} to {:?}", filename, path);
        Ok(path)
    }
}

fn download(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url).call().map_err(|e| {
        OcrError::InitializationError(format!("Failed to download {}: {}", url, e))
    })?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    // Interrupted downloads must not look cached
    let partial = partial_path(path);
    let mut file = File::create(&partial).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create {:?}: {}", partial, e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        OcrError::InitializationError(format!("Failed to write {:?}: {}", partial, e))
    })?;
    std::fs::rename(&partial, path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to move {:?} into place: {}", partial, e))
    })?;

    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
