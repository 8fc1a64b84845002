use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Logic used when none is configured.
pub const DEFAULT_LOGIC: &str = "ALL";

/// Backend configuration.
///
/// Can be built in code or shipped by the orchestration layer as JSON:
///
/// ```
/// use symex_smt_backend::BackendConfig;
///
/// let config = BackendConfig::from_json(r#"{ "logic": "QF_SLIA" }"#).unwrap();
/// assert_eq!(config.logic, "QF_SLIA");
/// assert!(config.daggify);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Logic named in the `(set-logic ...)` preamble.
    pub logic: String,
    /// Bind repeated compound subterms of each assertion with `let`.
    pub daggify: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            logic: DEFAULT_LOGIC.to_string(),
            daggify: true,
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific logic in the script preamble.
    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.logic = logic.into();
        self
    }

    /// Enable or disable subterm sharing.
    pub fn with_daggify(mut self, daggify: bool) -> Self {
        self.daggify = daggify;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BackendError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the logic is a single SMT-LIB symbol.
    pub fn validate(&self) -> Result<(), BackendError> {
        let bad = self.logic.is_empty()
            || self
                .logic
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '|' | ';' | '"'));
        if bad {
            return Err(BackendError::InvalidConfig(format!(
                "invalid logic name: {:?}",
                self.logic
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.logic, "ALL");
        assert!(config.daggify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = BackendConfig::new()
            .with_logic("QF_SLIA")
            .with_daggify(false);
        assert_eq!(config.logic, "QF_SLIA");
        assert!(!config.daggify);
    }

    #[test]
    fn from_json_full() {
        let config = BackendConfig::from_json(r#"{"logic": "QF_S", "daggify": false}"#).unwrap();
        assert_eq!(config, BackendConfig::new().with_logic("QF_S").with_daggify(false));
    }

    #[test]
    fn from_json_defaults() {
        let config = BackendConfig::from_json("{}").unwrap();
        assert_eq!(config, BackendConfig::default());
    }

    #[test]
    fn from_json_rejects_bad_logic() {
        let err = BackendConfig::from_json(r#"{"logic": "QF S"}"#).unwrap_err();
        assert!(matches!(err, BackendError::InvalidConfig(_)), "{err:?}");
        assert!(BackendConfig::new().with_logic("").validate().is_err());
        assert!(BackendConfig::new().with_logic("(ALL)").validate().is_err());
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = BackendConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, BackendError::InvalidConfig(_)));
    }

    #[test]
    fn serializes_round_trip() {
        let config = BackendConfig::new().with_logic("QF_SLIA");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BackendConfig::from_json(&json).unwrap(), config);
    }
}
