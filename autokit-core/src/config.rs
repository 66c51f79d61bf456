use crate::error::ConfigError;
use crate::themes::ThemeWeights;
use crate::types::PostingSchedule;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Model parameters the original bot hard-coded.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Trailing modification window for the backup utility.
pub const DEFAULT_BACKUP_WINDOW: Duration = Duration::from_secs(3 * 60);

/// OAuth2 user-context credentials for the posting account.
///
/// `client_id`/`client_secret` identify the application; `access_token` is
/// the user token requests are made with. When a `refresh_token` is present
/// the token is exchanged once at startup, never as an in-flight retry.
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub openai_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub twitter: TwitterCredentials,
    pub posting_schedule: PostingSchedule,
    pub themes: ThemeWeights,
    /// When false (the default) the binary posts once and exits; the
    /// scheduler loop only runs when this switch is set.
    pub run_scheduler: bool,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let posting_schedule = match env::var("AUTOKIT_POSTING_TIMES") {
            Ok(raw) => PostingSchedule::parse(raw.split(','))?,
            Err(_) => PostingSchedule::default_times(),
        };

        Ok(Self {
            openai_api_key: required_var("OPENAI_API_KEY")?,
            model: env::var("AUTOKIT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            twitter: TwitterCredentials {
                client_id: required_var("TWITTER_CLIENT_ID")?,
                client_secret: required_var("TWITTER_CLIENT_SECRET")?,
                access_token: required_var("TWITTER_ACCESS_TOKEN")?,
                refresh_token: env::var("TWITTER_REFRESH_TOKEN").ok(),
            },
            posting_schedule,
            themes: ThemeWeights::default_tech(),
            run_scheduler: env::var("AUTOKIT_SCHEDULE")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Files modified within this trailing window of "now" are copied.
    /// The boundary is inclusive: a file exactly `window` old still counts.
    pub window: Duration,
}

impl BackupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let pictures = default_pictures_dir();

        let source_dir = env::var("AUTOKIT_BACKUP_SOURCE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| pictures.join("Screenshots"));
        let dest_dir = env::var("AUTOKIT_BACKUP_DEST")
            .map(PathBuf::from)
            .unwrap_or_else(|_| pictures.join("Screenshots_Backup"));

        let window = match env::var("AUTOKIT_BACKUP_WINDOW_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    field: "AUTOKIT_BACKUP_WINDOW_SECS".to_string(),
                    value: raw.clone(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "AUTOKIT_BACKUP_WINDOW_SECS".to_string(),
                        value: raw,
                    });
                }
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_BACKUP_WINDOW,
        };

        Ok(Self {
            source_dir,
            dest_dir,
            window,
        })
    }
}

fn required_var(var_name: &str) -> Result<String, ConfigError> {
    env::var(var_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
            var_name: var_name.to_string(),
        })
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn default_pictures_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_truthy_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool(" TRUE "));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_default_backup_window_is_three_minutes() {
        assert_eq!(DEFAULT_BACKUP_WINDOW, Duration::from_secs(180));
    }

    #[test]
    fn test_stock_defaults_are_valid() {
        assert_eq!(PostingSchedule::default_times().len(), 3);
        assert_eq!(ThemeWeights::default_tech().len(), 4);
    }
}
