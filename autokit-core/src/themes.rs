use crate::error::ConfigError;

/// Relative selection weights for content themes.
///
/// Weights do not need to sum to 1; selection probability is proportional.
/// Built once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ThemeWeights {
    entries: Vec<(String, f64)>,
    total: f64,
}

impl ThemeWeights {
    pub fn try_from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries: Vec<(String, f64)> = pairs
            .into_iter()
            .map(|(name, weight)| (name.into(), weight))
            .collect();

        if entries.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "theme weight table must not be empty".to_string(),
            });
        }

        for (name, weight) in &entries {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("theme weight '{}'", name),
                    value: weight.to_string(),
                });
            }
        }

        let total = entries.iter().map(|(_, w)| w).sum();
        Ok(Self { entries, total })
    }

    /// The stock theme table the bot ships with.
    pub fn default_tech() -> Self {
        Self::try_from_pairs([
            ("tech news", 0.3),
            ("AI developments", 0.3),
            ("coding tips", 0.2),
            ("fun tech facts", 0.2),
        ])
        .expect("stock theme table is valid")
    }

    /// Pick one theme, probability proportional to its weight.
    ///
    /// Draws fresh from `rng` on every call; nothing is cached.
    pub fn choose<'a>(&'a self, rng: &mut fastrand::Rng) -> &'a str {
        let mut remaining = rng.f64() * self.total;
        for (name, weight) in &self.entries {
            remaining -= weight;
            if remaining < 0.0 {
                return name;
            }
        }
        // Floating point can leave a sliver of the range unclaimed.
        &self.entries[self.entries.len() - 1].0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
