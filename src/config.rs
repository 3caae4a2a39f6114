use std::{collections::BTreeMap, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

pub const DEFAULT_LOCAL_NAME: &str = "Aula101";
pub const DEFAULT_SERVICE_UUID: Uuid = Uuid::from_u128(0x12345678_1234_5678_1234_56789abcdef0);
pub const DEFAULT_DURATION_SECS: u64 = 300;

/// Settings for a single advertising session. Built once, handed by
/// reference to the advertiser, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconConfig {
    #[serde(default = "default_local_name")]
    pub local_name: String,
    #[serde(default = "default_service_uuids")]
    pub service_uuids: Vec<Uuid>,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_discoverable")]
    pub discoverable: bool,
    #[serde(default)]
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
}

fn default_local_name() -> String {
    DEFAULT_LOCAL_NAME.to_string()
}

fn default_service_uuids() -> Vec<Uuid> {
    vec![DEFAULT_SERVICE_UUID]
}

fn default_duration_secs() -> u64 {
    DEFAULT_DURATION_SECS
}

fn default_discoverable() -> bool {
    true
}

impl Default for BeaconConfig {
    fn default() -> Self {
        BeaconConfig {
            local_name: default_local_name(),
            service_uuids: default_service_uuids(),
            duration_secs: default_duration_secs(),
            discoverable: default_discoverable(),
            manufacturer_data: BTreeMap::new(),
        }
    }
}

impl BeaconConfig {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::read(path.as_ref())
            .await
            .context("failed to read config file")?;
        serde_json::from_slice(&file).context("failed to parse config")
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_literals() {
        let config = BeaconConfig::default();
        assert_eq!(config.local_name, "Aula101");
        assert_eq!(
            config.service_uuids,
            vec![Uuid::parse_str("12345678-1234-5678-1234-56789abcdef0").unwrap()]
        );
        assert_eq!(config.duration(), Duration::from_secs(300));
        assert!(config.discoverable);
        assert!(config.manufacturer_data.is_empty());
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config: BeaconConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.local_name, BeaconConfig::default().local_name);
        assert_eq!(config.service_uuids, BeaconConfig::default().service_uuids);
        assert_eq!(config.duration_secs, DEFAULT_DURATION_SECS);
    }

    #[test]
    fn parses_full_config() {
        let config: BeaconConfig = serde_json::from_str(
            r#"{
                "local_name": "Aula202",
                "service_uuids": ["7e9c1c5b-a3d2-4b19-9a4e-1f2d3c4b5a69"],
                "duration_secs": 60,
                "discoverable": false,
                "manufacturer_data": { "1112": [33, 34, 35, 36] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.local_name, "Aula202");
        assert_eq!(config.duration_secs, 60);
        assert!(!config.discoverable);
        assert_eq!(config.manufacturer_data[&1112], vec![33, 34, 35, 36]);
    }

    #[test]
    fn rejects_malformed_uuid() {
        let res = serde_json::from_str::<BeaconConfig>(r#"{ "service_uuids": ["not-a-uuid"] }"#);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        assert!(BeaconConfig::from_file("/nonexistent/beacon.json")
            .await
            .is_err());
    }
}
