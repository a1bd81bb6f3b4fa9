//! Device descriptors and classification tags

use crate::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag sent to native code for low-energy devices
pub const HM10_TAG: &str = "HM10";

/// Tag sent to native code for everything else
pub const CLASSIC_TAG: &str = "CLASSIC";

/// Platform classification of a Bluetooth device
///
/// Discriminants match `BluetoothDevice.DEVICE_TYPE_*` on Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Unknown = 0,
    Classic = 1,
    Le = 2,
    Dual = 3,
}

impl DeviceType {
    /// Map a raw platform value; anything unrecognised is `Unknown`
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => DeviceType::Classic,
            2 => DeviceType::Le,
            3 => DeviceType::Dual,
            _ => DeviceType::Unknown,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Label forwarded to the native sink in place of [`DeviceType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceTypeTag {
    #[serde(rename = "HM10")]
    Hm10,
    #[serde(rename = "CLASSIC")]
    Classic,
}

impl DeviceTypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceTypeTag::Hm10 => HM10_TAG,
            DeviceTypeTag::Classic => CLASSIC_TAG,
        }
    }
}

impl fmt::Display for DeviceTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceTypeTag {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            HM10_TAG => Ok(DeviceTypeTag::Hm10),
            CLASSIC_TAG => Ok(DeviceTypeTag::Classic),
            other => Err(BridgeError::InvalidDeviceType(other.to_string())),
        }
    }
}

/// Device descriptor as handed in by the platform scan callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothDevice {
    /// Hardware address, e.g. `AA:BB:CC:DD:EE:FF`
    pub address: String,
    /// Advertised name, if the platform knows one
    pub name: Option<String>,
    pub device_type: DeviceType,
}

impl BluetoothDevice {
    pub fn new(address: impl Into<String>, name: Option<String>, device_type: DeviceType) -> Self {
        Self {
            address: address.into(),
            name,
            device_type,
        }
    }
}

/// One forwarded discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub address: String,
    pub name: Option<String>,
    pub device_type: DeviceTypeTag,
}

impl ScanEvent {
    pub fn from_device(device: &BluetoothDevice) -> Self {
        Self {
            address: device.address.clone(),
            name: device.name.clone(),
            device_type: super::classify(device.device_type),
        }
    }
}
