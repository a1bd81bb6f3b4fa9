//! BLE scan event handling
//!
//! Platform scan callbacks come in through [`LeScanCallback`], get classified by
//! [`ScanEventAdapter`] and leave through a [`ScanSink`].

pub mod adapter;
pub mod collector;
pub mod device;
#[cfg(feature = "ble")]
pub mod discovery;

pub use adapter::{classify, FnSink, LeScanCallback, ScanEventAdapter, ScanSink};
pub use collector::{DeviceCollector, DiscoveredDevice};
pub use device::{BluetoothDevice, DeviceType, DeviceTypeTag, ScanEvent};
#[cfg(feature = "ble")]
pub use discovery::{
    device_from_properties, encode_scan_record, forward_discoveries, forward_peripheral,
    scan_rssi, RSSI_UNAVAILABLE,
};
