use safeload_core::{SafeError, SafeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the loader does with an index whose sample cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Yield the next valid sample after the failed index instead.
    #[default]
    Substitute,
    /// Drop the failed index from the pass.
    Skip,
}

/// Behaviour switches for a [`SafeDataset`](crate::SafeDataset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeConfig {
    /// Scan the whole collection when the wrapper is created.
    pub eager: bool,
    /// Record per-index validity and skip known-invalid indices.
    pub cache_validity: bool,
    /// Keep produced samples so repeated reads skip retrieval.
    pub memoize: bool,
    pub policy: FailurePolicy,
}

impl Default for SafeConfig {
    fn default() -> Self {
        SafeConfig {
            eager: false,
            cache_validity: true,
            memoize: false,
            policy: FailurePolicy::Substitute,
        }
    }
}

impl SafeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn cache_validity(mut self, enabled: bool) -> Self {
        self.cache_validity = enabled;
        self
    }

    pub fn memoize(mut self, enabled: bool) -> Self {
        self.memoize = enabled;
        self
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject combinations that need a validity cache while it is disabled.
    pub fn validate(&self) -> SafeResult<()> {
        if !self.cache_validity && self.eager {
            return Err(SafeError::Config(
                "eager scan requires cache_validity".into(),
            ));
        }
        if !self.cache_validity && self.memoize {
            return Err(SafeError::Config(
                "memoize requires cache_validity".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SafeResult<Self> {
        let config: SafeConfig =
            serde_json::from_str(json).map_err(|e| SafeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SafeResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| SafeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> SafeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SafeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SafeConfig::default();
        assert!(!config.eager);
        assert!(config.cache_validity);
        assert!(!config.memoize);
        assert_eq!(config.policy, FailurePolicy::Substitute);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SafeConfig::from_json_str(r#"{"eager": true, "policy": "skip"}"#).unwrap();
        assert!(config.eager);
        assert!(config.cache_validity);
        assert_eq!(config.policy, FailurePolicy::Skip);
    }

    #[test]
    fn test_invalid_combination_rejected() {
        let err = SafeConfig::from_json_str(r#"{"eager": true, "cache_validity": false}"#)
            .unwrap_err();
        assert!(matches!(err, SafeError::Config(_)));
        assert!(SafeConfig::new().cache_validity(false).memoize(true).validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SafeConfig::from_json_str("{eager: yes"),
            Err(SafeError::Config(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let config = SafeConfig::new().memoize(true).policy(FailurePolicy::Skip);
        let path = std::env::temp_dir().join(format!("safeload-config-{}.json", std::process::id()));
        fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = SafeConfig::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = SafeConfig::from_json_file("/nonexistent/safeload.json").unwrap_err();
        assert!(matches!(err, SafeError::Config(msg) if msg.contains("safeload.json")));
    }
}
