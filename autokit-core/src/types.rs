use crate::error::ConfigError;
use chrono::NaiveTime;

/// Times of day (24-hour clock) at which a post is triggered once per day.
///
/// Duplicate entries are allowed; they fire as independent triggers in the
/// same scheduler iteration.
#[derive(Debug, Clone)]
pub struct PostingSchedule {
    times: Vec<NaiveTime>,
}

impl PostingSchedule {
    /// Parse "HH:MM" strings into a schedule. Any invalid entry fails the
    /// whole schedule; this surfaces at startup, not mid-run.
    pub fn parse<I, S>(times: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for raw in times {
            let raw = raw.as_ref().trim();
            let time = NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
                ConfigError::InvalidValue {
                    field: "posting time".to_string(),
                    value: raw.to_string(),
                }
            })?;
            parsed.push(time);
        }

        if parsed.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "posting schedule must contain at least one time".to_string(),
            });
        }

        Ok(Self { times: parsed })
    }

    /// The stock schedule the bot ships with.
    pub fn default_times() -> Self {
        Self::parse(["09:00", "12:00", "15:00"]).expect("stock schedule is valid")
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
