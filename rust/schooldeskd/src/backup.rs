//! Workspace backup bundles.
//!
//! A bundle is a zip holding `manifest.json` and the workspace database. The
//! manifest records the SHA-256 of the database entry; import refuses a bundle
//! whose database does not match it. A bare `.sqlite3` file is accepted as a
//! legacy backup and copied as is.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::store::DB_FILE_NAME;

const MANIFEST_ENTRY: &str = "manifest.json";
const DB_ENTRY: &str = "db/schooldesk.sqlite3";
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
pub const BUNDLE_FORMAT_V1: &str = "schooldesk-workspace-v1";
pub const LEGACY_SQLITE_FORMAT: &str = "legacy-sqlite3";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleManifest {
    format: String,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    app_version: Option<String>,
    #[serde(default)]
    exported_at: Option<u64>,
    #[serde(default)]
    db_sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub db_sha256: String,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn export_workspace_bundle(
    workspace_path: &Path,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let db_path = workspace_path.join(DB_FILE_NAME);
    if !db_path.is_file() {
        bail!("workspace database not found: {}", db_path.display());
    }
    let db_bytes =
        std::fs::read(&db_path).with_context(|| format!("failed to read {}", db_path.display()))?;
    let manifest = BundleManifest {
        format: BUNDLE_FORMAT_V1.to_string(),
        version: 1,
        app_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        exported_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs()),
        db_sha256: Some(sha256_hex(&db_bytes)),
    };

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create bundle {}", out_path.display()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let entries: [(&str, Vec<u8>); 2] = [
        (
            MANIFEST_ENTRY,
            serde_json::to_vec_pretty(&manifest).context("failed to serialize manifest")?,
        ),
        (DB_ENTRY, db_bytes),
    ];
    for (name, bytes) in &entries {
        zip.start_file(*name, opts)
            .with_context(|| format!("failed to start {}", name))?;
        zip.write_all(bytes)
            .with_context(|| format!("failed to write {}", name))?;
    }
    zip.finish().context("failed to finalize bundle")?;

    let db_sha256 = manifest.db_sha256.unwrap_or_default();
    tracing::info!(out = %out_path.display(), sha256 = %db_sha256, "workspace exported");
    Ok(ExportSummary {
        bundle_format: manifest.format,
        entry_count: entries.len(),
        db_sha256,
    })
}

pub fn import_workspace_bundle(
    in_path: &Path,
    workspace_path: &Path,
) -> anyhow::Result<ImportSummary> {
    std::fs::create_dir_all(workspace_path)
        .with_context(|| format!("failed to create workspace {}", workspace_path.display()))?;
    let dst = workspace_path.join(DB_FILE_NAME);

    if !has_zip_magic(in_path)? {
        std::fs::copy(in_path, &dst).with_context(|| {
            format!(
                "failed to copy legacy backup {} to {}",
                in_path.display(),
                dst.display()
            )
        })?;
        return Ok(ImportSummary {
            bundle_format_detected: LEGACY_SQLITE_FORMAT.to_string(),
        });
    }

    let file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.display()))?;
    let mut archive = ZipArchive::new(file).context("invalid zip archive")?;
    let manifest: BundleManifest = serde_json::from_slice(&read_entry(&mut archive, MANIFEST_ENTRY)?)
        .context("manifest.json is invalid")?;
    if manifest.format != BUNDLE_FORMAT_V1 {
        bail!("unsupported bundle format: {}", manifest.format);
    }

    let db_bytes = read_entry(&mut archive, DB_ENTRY)?;
    if let Some(expected) = manifest.db_sha256.as_deref() {
        let actual = sha256_hex(&db_bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            bail!("database checksum mismatch: manifest {expected}, bundle {actual}");
        }
    }
    replace_file(&dst, &db_bytes)?;

    Ok(ImportSummary {
        bundle_format_detected: manifest.format,
    })
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> anyhow::Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("bundle missing {}", name))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to read {}", name))?;
    Ok(bytes)
}

/// Writes `bytes` next to `dst` first, then swaps it into place.
fn replace_file(dst: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let staged = dst.with_extension("sqlite3.importing");
    {
        let mut out = File::create(&staged)
            .with_context(|| format!("failed to create {}", staged.display()))?;
        out.write_all(bytes)
            .and_then(|_| out.flush())
            .with_context(|| format!("failed to write {}", staged.display()))?;
    }
    if dst.exists() {
        std::fs::remove_file(dst)
            .with_context(|| format!("failed to remove old database {}", dst.display()))?;
    }
    std::fs::rename(&staged, dst)
        .with_context(|| format!("failed to move database into {}", dst.display()))
}

fn has_zip_magic(path: &Path) -> anyhow::Result<bool> {
    let mut f =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    Ok(read == sig.len() && sig == ZIP_MAGIC)
}
