//! End-to-end backup pass tests on real temporary directories.

use autokit_core::{BackupConfig, BackupError, CoreError};
use file_backup::{run_backup, BackupReport};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_secs(180);

struct Fixture {
    _root: TempDir,
    config: BackupConfig,
}

fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("Screenshots");
    let dest = root.path().join("Screenshots_Backup");
    fs::create_dir(&source).unwrap();

    Fixture {
        config: BackupConfig {
            source_dir: source,
            dest_dir: dest,
            window: WINDOW,
        },
        _root: root,
    }
}

fn write_with_age(dir: &Path, name: &str, contents: &[u8], age: Duration) {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    let mtime = FileTime::from_system_time(SystemTime::now() - age);
    filetime::set_file_mtime(&path, mtime).unwrap();
}

#[test]
fn test_recent_files_are_copied_and_old_ones_skipped() {
    let fx = fixture();
    write_with_age(&fx.config.source_dir, "recent.png", b"recent", Duration::from_secs(120));
    write_with_age(&fx.config.source_dir, "stale.png", b"stale", Duration::from_secs(600));

    let report = run_backup(&fx.config).unwrap();

    assert_eq!(report, BackupReport { copied: 1, failed: 0 });
    assert_eq!(fs::read(fx.config.dest_dir.join("recent.png")).unwrap(), b"recent");
    assert!(!fx.config.dest_dir.join("stale.png").exists());
}

#[test]
fn test_copy_preserves_modification_time() {
    let fx = fixture();
    write_with_age(&fx.config.source_dir, "shot.png", b"pixels", Duration::from_secs(60));

    run_backup(&fx.config).unwrap();

    let source_mtime =
        FileTime::from_last_modification_time(&fs::metadata(fx.config.source_dir.join("shot.png")).unwrap());
    let dest_mtime =
        FileTime::from_last_modification_time(&fs::metadata(fx.config.dest_dir.join("shot.png")).unwrap());
    assert_eq!(source_mtime.unix_seconds(), dest_mtime.unix_seconds());
}

#[test]
fn test_collisions_get_numeric_suffixes_and_nothing_is_overwritten() {
    let fx = fixture();
    fs::create_dir(&fx.config.dest_dir).unwrap();
    fs::write(fx.config.dest_dir.join("photo.png"), b"first backup").unwrap();

    write_with_age(&fx.config.source_dir, "photo.png", b"second", Duration::from_secs(30));
    run_backup(&fx.config).unwrap();

    write_with_age(&fx.config.source_dir, "photo.png", b"third", Duration::from_secs(30));
    run_backup(&fx.config).unwrap();

    assert_eq!(fs::read(fx.config.dest_dir.join("photo.png")).unwrap(), b"first backup");
    assert_eq!(fs::read(fx.config.dest_dir.join("photo_1.png")).unwrap(), b"second");
    assert_eq!(fs::read(fx.config.dest_dir.join("photo_2.png")).unwrap(), b"third");
}

#[test]
fn test_missing_source_is_fatal_and_copies_nothing() {
    let root = tempfile::tempdir().unwrap();
    let config = BackupConfig {
        source_dir: root.path().join("does-not-exist"),
        dest_dir: root.path().join("backup"),
        window: WINDOW,
    };

    let result = run_backup(&config);
    assert!(matches!(
        result,
        Err(CoreError::Backup(BackupError::SourceMissing { .. }))
    ));
    // The destination is left uncreated; the run aborted before touching it.
    assert!(!config.dest_dir.exists());
}

#[test]
fn test_hidden_files_and_subdirectories_are_never_copied() {
    let fx = fixture();
    write_with_age(&fx.config.source_dir, ".DS_Store", b"junk", Duration::from_secs(10));
    fs::create_dir(fx.config.source_dir.join("nested")).unwrap();
    write_with_age(
        &fx.config.source_dir.join("nested"),
        "inside.png",
        b"deep",
        Duration::from_secs(10),
    );

    let report = run_backup(&fx.config).unwrap();

    assert_eq!(report, BackupReport { copied: 0, failed: 0 });
    assert!(!fx.config.dest_dir.join(".DS_Store").exists());
    assert!(!fx.config.dest_dir.join("nested").exists());
    assert!(!fx.config.dest_dir.join("inside.png").exists());
}

#[test]
fn test_quiet_pass_reports_zero_copies() {
    let fx = fixture();
    let report = run_backup(&fx.config).unwrap();
    assert_eq!(report, BackupReport::default());
}

#[cfg(unix)]
#[test]
fn test_per_file_error_does_not_abort_the_scan() {
    let fx = fixture();

    // A dangling symlink fails its metadata lookup; the scan must log it
    // and keep going.
    std::os::unix::fs::symlink(
        fx.config.source_dir.join("vanished.png"),
        fx.config.source_dir.join("dangling.png"),
    )
    .unwrap();
    write_with_age(&fx.config.source_dir, "survivor.png", b"ok", Duration::from_secs(30));

    let report = run_backup(&fx.config).unwrap();

    assert_eq!(report, BackupReport { copied: 1, failed: 1 });
    assert_eq!(fs::read(fx.config.dest_dir.join("survivor.png")).unwrap(), b"ok");
}
