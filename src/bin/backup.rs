use autokit_core::{BackupConfig, ErrorExt};
use file_backup::run_backup;

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("autokit_backup=debug,file_backup=debug")
        .init();

    let config = match BackupConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Startup failed: {}", e.user_friendly_message());
            return;
        }
    };

    tracing::info!(
        "Backing up files modified in the last {} seconds",
        config.window.as_secs()
    );

    match run_backup(&config) {
        Ok(report) => {
            if report.failed > 0 {
                tracing::warn!("{} file(s) could not be processed", report.failed);
            }
            if report.copied == 0 {
                tracing::info!(
                    "No new files found (modified in last {} seconds)",
                    config.window.as_secs()
                );
            } else {
                tracing::info!(
                    "Backup complete. {} files copied to: {}",
                    report.copied,
                    config.dest_dir.display()
                );
            }
        }
        Err(e) => {
            // Fatal: nothing was copied. The friendly message carries the
            // remediation hints.
            e.log_error();
            tracing::error!("{}", e.user_friendly_message());
        }
    }
}
