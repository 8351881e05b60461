// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model download manager for first-run ONNX model setup.
//!
//! Fetches the quantized ONNX export, tokenizer and config of a HuggingFace
//! repository on first run and caches them under the model directory, one
//! subdirectory per repository.

use std::path::{Path, PathBuf};

use blankfill_core::BlankfillError;
use tracing::info;

const HUGGINGFACE: &str = "https://huggingface.co";

/// Local paths of one model's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
    pub config: PathBuf,
}

impl ModelFiles {
    /// Returns true if the model and tokenizer exist. `config.json` is optional.
    pub fn is_available(&self) -> bool {
        self.model.exists() && self.tokenizer.exists()
    }
}

/// Manages ONNX model download and path resolution.
pub struct ModelManager {
    model_dir: PathBuf,
}

impl ModelManager {
    /// Creates a new ModelManager rooted at `model_dir`.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Directory holding the files of `repo` (`owner/name` becomes `owner--name`).
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.model_dir.join(repo.replace('/', "--"))
    }

    /// Local file paths for `repo`.
    pub fn files(&self, repo: &str) -> ModelFiles {
        let dir = self.repo_dir(repo);
        ModelFiles {
            model: dir.join("model.onnx"),
            tokenizer: dir.join("tokenizer.json"),
            config: dir.join("config.json"),
        }
    }

    /// Return the files of `repo`, downloading any that are missing.
    pub async fn ensure(&self, repo: &str) -> Result<ModelFiles, BlankfillError> {
        let files = self.files(repo);
        if files.is_available() && files.config.exists() {
            return Ok(files);
        }

        info!(repo, "model files missing, downloading from HuggingFace");
        let dir = self.repo_dir(repo);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BlankfillError::Config(format!(
                "failed to create model directory {}: {e}",
                dir.display()
            ))
        })?;

        let downloads = [
            (&files.model, "onnx/model_quantized.onnx"),
            (&files.tokenizer, "tokenizer.json"),
            (&files.config, "config.json"),
        ];

        for (dest, remote) in downloads {
            if dest.exists() {
                continue;
            }
            let url = format!("{HUGGINGFACE}/{repo}/resolve/main/{remote}");
            match download_file(&url, dest).await {
                Ok(size) => info!(repo, file = remote, size, "downloaded model file"),
                Err(e) => {
                    // Remove partial downloads so the next start retries.
                    let _ = tokio::fs::remove_file(dest).await;
                    return Err(e);
                }
            }
        }

        info!(repo, dir = %dir.display(), "model ready");
        Ok(files)
    }

    /// Return the files of `repo`, failing if they are not on disk.
    pub fn require(&self, repo: &str) -> Result<ModelFiles, BlankfillError> {
        let files = self.files(repo);
        if files.is_available() {
            Ok(files)
        } else {
            Err(BlankfillError::Config(format!(
                "model `{repo}` not found in {} and auto_download is disabled",
                self.model_dir.display()
            )))
        }
    }
}

/// Download a file from a URL to a local path.
async fn download_file(url: &str, dest: &Path) -> Result<usize, BlankfillError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| BlankfillError::inference(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(BlankfillError::inference(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }

    let bytes = response.bytes().await.map_err(|e| {
        BlankfillError::inference(format!("failed to read response body from {url}: {e}"))
    })?;

    tokio::fs::write(dest, &bytes).await.map_err(|e| {
        BlankfillError::inference(format!("failed to write {}: {e}", dest.display()))
    })?;

    Ok(bytes.len())
}
