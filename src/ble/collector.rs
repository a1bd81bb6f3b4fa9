//! Collects the devices seen during a scan
//!
//! Used by the native side to fill a device picker: one record per address,
//! refreshed on every sighting.

use super::adapter::ScanSink;
use super::device::DeviceTypeTag;
use crate::BridgeError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A device seen at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub address: String,
    pub name: Option<String>,
    pub device_type: DeviceTypeTag,
    /// Latest signal strength. `ScanSink` carries no RSSI, so this stays
    /// `None` until the caller reports one through `record_rssi`.
    pub rssi: Option<i32>,
    pub seen_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct DeviceCollector {
    devices: RwLock<HashMap<String, DiscoveredDevice>>,
}

impl DeviceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest RSSI for a known device; returns false if unknown.
    ///
    /// Sink callbacks never set RSSI, so callers that want it in
    /// `snapshot_json` must report it here after each sighting.
    pub fn record_rssi(&self, address: &str, rssi: i32) -> bool {
        match self.devices.write().get_mut(address) {
            Some(device) => {
                device.rssi = Some(rssi);
                true
            }
            None => false,
        }
    }

    /// All devices, sorted by address
    pub fn devices(&self) -> Vec<DiscoveredDevice> {
        let mut devices: Vec<DiscoveredDevice> = self.devices.read().values().cloned().collect();
        devices.sort_by(|a, b| a.address.cmp(&b.address));
        devices
    }

    pub fn get(&self, address: &str) -> Option<DiscoveredDevice> {
        self.devices.read().get(address).cloned()
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    pub fn clear(&self) {
        self.devices.write().clear();
    }

    /// JSON array of [`DiscoveredDevice`], sorted by address
    pub fn snapshot_json(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(&self.devices())?)
    }
}

impl ScanSink for DeviceCollector {
    fn on_le_scan(&self, address: &str, name: Option<&str>, device_type: DeviceTypeTag) {
        let now = Utc::now();
        let mut devices = self.devices.write();

        match devices.get_mut(address) {
            Some(device) => {
                // Names are not in every advertisement; keep the last one we saw.
                if let Some(name) = name {
                    device.name = Some(name.to_string());
                }
                device.device_type = device_type;
                device.seen_count += 1;
                device.last_seen = now;
            }
            None => {
                s_debug!("🆕 New device {} ({:?}, {})", address, name, device_type);
                devices.insert(
                    address.to_string(),
                    DiscoveredDevice {
                        address: address.to_string(),
                        name: name.map(str::to_string),
                        device_type,
                        rssi: None,
                        seen_count: 1,
                        first_seen: now,
                        last_seen: now,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_dedups_by_address() {
        let collector = DeviceCollector::new();
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", Some("Vario01"), DeviceTypeTag::Hm10);
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);
        collector.on_le_scan("11:22:33:44:55:66", None, DeviceTypeTag::Classic);

        assert_eq!(collector.len(), 2);

        let vario = collector.get("AA:BB:CC:DD:EE:FF").expect("Should be collected");
        assert_eq!(vario.seen_count, 2);
        assert_eq!(vario.name.as_deref(), Some("Vario01"));
        assert!(vario.last_seen >= vario.first_seen);
    }

    #[test]
    fn test_devices_sorted_by_address() {
        let collector = DeviceCollector::new();
        collector.on_le_scan("CC:00:00:00:00:00", None, DeviceTypeTag::Classic);
        collector.on_le_scan("AA:00:00:00:00:00", None, DeviceTypeTag::Hm10);
        collector.on_le_scan("BB:00:00:00:00:00", None, DeviceTypeTag::Hm10);

        let addresses: Vec<String> = collector.devices().into_iter().map(|d| d.address).collect();
        assert_eq!(
            addresses,
            vec!["AA:00:00:00:00:00", "BB:00:00:00:00:00", "CC:00:00:00:00:00"]
        );
    }

    #[test]
    fn test_record_rssi() {
        let collector = DeviceCollector::new();
        assert!(!collector.record_rssi("AA:BB:CC:DD:EE:FF", -70));

        collector.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);
        assert!(collector.record_rssi("AA:BB:CC:DD:EE:FF", -70));
        assert_eq!(collector.get("AA:BB:CC:DD:EE:FF").unwrap().rssi, Some(-70));
    }

    #[test]
    fn test_snapshot_json() {
        let collector = DeviceCollector::new();
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", Some("Vario01"), DeviceTypeTag::Hm10);

        let json: serde_json::Value =
            serde_json::from_str(&collector.snapshot_json().unwrap()).unwrap();
        assert_eq!(json[0]["address"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(json[0]["name"], "Vario01");
        assert_eq!(json[0]["device_type"], "HM10");
        assert_eq!(json[0]["seen_count"], 1);

        collector.clear();
        assert!(collector.is_empty());
        assert_eq!(collector.snapshot_json().unwrap(), "[]");
    }

    #[test]
    fn test_rssi_only_from_record_rssi() {
        let collector = DeviceCollector::new();
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);

        let json: serde_json::Value =
            serde_json::from_str(&collector.snapshot_json().unwrap()).unwrap();
        assert!(json[0]["rssi"].is_null());

        collector.record_rssi("AA:BB:CC:DD:EE:FF", -58);
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);

        let json: serde_json::Value =
            serde_json::from_str(&collector.snapshot_json().unwrap()).unwrap();
        assert_eq!(json[0]["rssi"], -58);
        assert_eq!(json[0]["seen_count"], 2);
    }
}
