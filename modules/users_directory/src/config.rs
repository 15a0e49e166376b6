use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::service::{ServiceConfig, UnchangedEmailPolicy};
use crate::infra::latency::LatencyProfile;

/// Configuration for the users_directory module (`modules.users_directory`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersDirectoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default)]
    pub unchanged_email: UnchangedEmailPolicy,
    /// Buffered events per SSE subscriber before the oldest are dropped
    #[serde(default = "default_sse_capacity")]
    pub sse_capacity: usize,
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl Default for UsersDirectoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            unchanged_email: UnchangedEmailPolicy::default(),
            sse_capacity: default_sse_capacity(),
            latency: LatencyConfig::default(),
        }
    }
}

impl UsersDirectoryConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            anyhow::bail!("users_directory: page sizes must be positive");
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "users_directory: default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        Ok(())
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            unchanged_email: self.unchanged_email,
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    1000
}

fn default_sse_capacity() -> usize {
    1024
}

/// Either a named preset (`latency: demo`) or explicit per-operation delays
/// (`latency: { create: 800ms }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LatencyConfig {
    Preset(LatencyPreset),
    Custom(CustomLatency),
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self::Preset(LatencyPreset::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyPreset {
    None,
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomLatency {
    #[serde(with = "humantime_serde")]
    pub list: Duration,
    #[serde(with = "humantime_serde")]
    pub get: Duration,
    #[serde(with = "humantime_serde")]
    pub create: Duration,
    #[serde(with = "humantime_serde")]
    pub update: Duration,
    #[serde(with = "humantime_serde")]
    pub delete: Duration,
}

impl LatencyConfig {
    pub fn profile(&self) -> LatencyProfile {
        match self {
            Self::Preset(LatencyPreset::None) => LatencyProfile::default(),
            Self::Preset(LatencyPreset::Demo) => LatencyProfile::demo(),
            Self::Custom(c) => LatencyProfile {
                list: c.list,
                get: c.get,
                create: c.create,
                update: c.update,
                delete: c.delete,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: UsersDirectoryConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.default_page_size, 50);
        assert_eq!(cfg.max_page_size, 1000);
        assert_eq!(cfg.unchanged_email, UnchangedEmailPolicy::Reject);
        assert_eq!(cfg.sse_capacity, 1024);
        assert!(cfg.latency.profile().is_zero());
        cfg.validate().unwrap();
    }

    #[test]
    fn demo_preset() {
        let cfg: UsersDirectoryConfig =
            serde_json::from_value(json!({ "latency": "demo" })).unwrap();
        assert_eq!(cfg.latency.profile(), LatencyProfile::demo());
    }

    #[test]
    fn custom_latency_uses_humantime() {
        let cfg: UsersDirectoryConfig = serde_json::from_value(json!({
            "unchanged_email": "ignore",
            "latency": { "create": "800ms", "list": "1s" }
        }))
        .unwrap();

        let p = cfg.latency.profile();
        assert_eq!(p.create, Duration::from_millis(800));
        assert_eq!(p.list, Duration::from_secs(1));
        assert_eq!(p.get, Duration::ZERO);
        assert_eq!(cfg.unchanged_email, UnchangedEmailPolicy::Ignore);
    }

    #[test]
    fn unknown_fields_rejected() {
        let res: Result<UsersDirectoryConfig, _> =
            serde_json::from_value(json!({ "page_size": 10 }));
        assert!(res.is_err());
    }

    #[test]
    fn validate_page_sizes() {
        let cfg = UsersDirectoryConfig {
            default_page_size: 100,
            max_page_size: 10,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = UsersDirectoryConfig {
            default_page_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
