//! Artifact file reading, decoding, and discovery
//!
//! Artifacts may have been produced by different tooling versions, so each
//! file goes through an ordered list of decode strategies: bincode first,
//! then JSON as the generic fallback. The first success short-circuits, and
//! neither strategy leaks past this module.

use super::BEST_MODEL_PREFIX;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Decode an artifact, trying bincode then JSON
pub(super) fn decode_artifact<T>(bytes: &[u8], path: &Path) -> Result<T>
where
    T: bincode::Decode<()> + serde::de::DeserializeOwned,
{
    let bincode_err = match bincode::decode_from_slice::<T, _>(bytes, bincode::config::standard())
    {
        Ok((value, _)) => return Ok(value),
        Err(err) => err,
    };
    serde_json::from_slice(bytes).with_context(|| {
        format!(
            "{} decodes as neither bincode ({}) nor JSON",
            path.display(),
            bincode_err
        )
    })
}

pub(super) fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read artifact {}", path.display()))
}

/// SHA256 checksum of artifact bytes, for integrity diagnostics
pub(super) fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Locate the best-single-model artifact by prefix scan. The concrete file
/// name depends on which algorithm won the selection run, so only the
/// `best_model_` prefix is fixed. The lexicographically smallest match wins
/// for determinism.
pub(super) fn find_best_model_file(models_dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(models_dir)
        .with_context(|| format!("failed to scan models directory {}", models_dir.display()))?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(BEST_MODEL_PREFIX))
                    .unwrap_or(false)
        })
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}
