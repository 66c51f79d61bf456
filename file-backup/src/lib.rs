use autokit_core::{BackupConfig, BackupError, CoreError};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};

/// Outcome of one backup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub copied: usize,
    pub failed: usize,
}

/// Copy files modified within the trailing window from the source folder
/// into the destination folder, renaming on collision.
///
/// One stateless pass: the destination's existing names are the only state
/// consulted. A missing source folder is fatal and copies nothing; errors
/// on individual files are logged, counted and skipped.
pub fn run_backup(config: &BackupConfig) -> Result<BackupReport, CoreError> {
    let source = &config.source_dir;
    if !source.exists() {
        return Err(CoreError::Backup(BackupError::SourceMissing {
            path: source.display().to_string(),
        }));
    }
    if !source.is_dir() {
        return Err(CoreError::Backup(BackupError::SourceNotADirectory {
            path: source.display().to_string(),
        }));
    }

    fs::create_dir_all(&config.dest_dir).map_err(|e| {
        CoreError::Backup(BackupError::DestinationUnavailable {
            path: config.dest_dir.display().to_string(),
            reason: e.to_string(),
        })
    })?;

    info!("Checking for new files in: {}", source.display());

    let now = SystemTime::now();
    let mut report = BackupReport::default();

    for entry in fs::read_dir(source)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error reading directory entry: {}", e);
                report.failed += 1;
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        match backup_entry(&entry.path(), &name, config, now) {
            Ok(Some(dest)) => {
                info!("Backed up: {} -> {}", name, dest.display());
                report.copied += 1;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Error processing {}: {}", name, e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Copy a single entry if it qualifies; `Ok(None)` means it was filtered
/// out (hidden, not a regular file, or outside the window).
fn backup_entry(
    path: &Path,
    name: &str,
    config: &BackupConfig,
    now: SystemTime,
) -> Result<Option<PathBuf>, CoreError> {
    if is_hidden(name) {
        return Ok(None);
    }

    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        debug!("Skipping non-file entry: {}", name);
        return Ok(None);
    }

    let modified = metadata.modified()?;
    if !modified_within(modified, now, config.window) {
        return Ok(None);
    }

    let dest = collision_free_path(&config.dest_dir, name);
    copy_with_metadata(path, &dest)?;
    Ok(Some(dest))
}

/// Hidden-file marker check, the same rule the scan applies on every entry.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Whether `modified` falls within the trailing `window` of `now`.
///
/// The boundary is inclusive: a file aged exactly `window` still counts.
/// A modification time in the future (clock skew) also counts.
pub fn modified_within(modified: SystemTime, now: SystemTime, window: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age <= window,
        Err(_) => true,
    }
}

/// First unused destination path for `file_name`, appending `_1`, `_2`, …
/// before the extension until the name is free. Never returns an existing
/// path, so existing backups are never overwritten.
pub fn collision_free_path(dest_dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dest_dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1u32;
    loop {
        let renamed = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = dest_dir.join(renamed);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copy contents plus metadata: permission bits travel with `fs::copy`,
/// access/modification times are mirrored afterwards.
fn copy_with_metadata(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(source, dest)?;

    let metadata = fs::metadata(source)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dest, atime, mtime)?;
    Ok(())
}
