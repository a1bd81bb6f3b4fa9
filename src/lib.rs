//! lescan-bridge - forwards BLE scan results from the platform Bluetooth stack to native code
//!
//! Each discovered device is classified as `HM10` (low-energy) or `CLASSIC` and handed,
//! synchronously, to a native sink identified by an opaque handle.

#[macro_use]
mod logging;

pub mod ble;
pub mod config;
pub mod ffi;

pub use ble::{
    classify, BluetoothDevice, DeviceCollector, FnSink, DeviceType, DeviceTypeTag, DiscoveredDevice,
    LeScanCallback, ScanEvent, ScanEventAdapter, ScanSink,
};
pub use crate::config::BridgeConfig;
pub use ffi::{register_sink, unregister_sink, NativeHandle, NativeSink, SinkRegistry};
pub use logging::{init_logging, parse_log_level};

use thiserror::Error;

/// Error types for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid device type tag: {0}")]
    InvalidDeviceType(String),

    #[error("Unknown native handle: {0}")]
    UnknownHandle(i64),

    #[error("JNI error: {0}")]
    Jni(String),

    #[error("BLE error: {0}")]
    Ble(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(feature = "ble")]
impl From<btleplug::Error> for BridgeError {
    fn from(err: btleplug::Error) -> Self {
        BridgeError::Ble(err.to_string())
    }
}

#[cfg(feature = "android")]
impl From<jni::errors::Error> for BridgeError {
    fn from(err: jni::errors::Error) -> Self {
        BridgeError::Jni(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}
