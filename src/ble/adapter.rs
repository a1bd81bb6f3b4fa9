//! Scan callback adapter
//!
//! Converts a platform discovery callback into a call on a native sink. The
//! adapter keeps no state besides its sink: no filtering, no buffering and no
//! deduplication. Every callback produces exactly one sink call, made on the
//! calling thread before the callback returns.

use super::device::{BluetoothDevice, DeviceType, DeviceTypeTag};
use std::sync::Arc;

/// Platform-facing scan callback
///
/// This is the single-method interface a platform scan API delivers
/// discoveries to.
pub trait LeScanCallback: Send + Sync {
    /// Called once per observed advertisement
    ///
    /// # Arguments
    /// * `device` - The advertising device
    /// * `rssi` - Received signal strength in dBm
    /// * `scan_record` - Raw advertisement bytes
    fn on_le_scan(&self, device: &BluetoothDevice, rssi: i32, scan_record: &[u8]);
}

/// Native-facing consumer of classified discoveries
pub trait ScanSink: Send + Sync {
    fn on_le_scan(&self, address: &str, name: Option<&str>, device_type: DeviceTypeTag);
}

/// Wraps a closure as a [`ScanSink`]
pub struct FnSink<F>(pub F);

impl<F> ScanSink for FnSink<F>
where
    F: Fn(&str, Option<&str>, DeviceTypeTag) + Send + Sync,
{
    fn on_le_scan(&self, address: &str, name: Option<&str>, device_type: DeviceTypeTag) {
        (self.0)(address, name, device_type)
    }
}

impl<S: ScanSink + ?Sized> ScanSink for Arc<S> {
    fn on_le_scan(&self, address: &str, name: Option<&str>, device_type: DeviceTypeTag) {
        (**self).on_le_scan(address, name, device_type)
    }
}

/// Coarse classification: low-energy devices are HM10, everything else is CLASSIC.
///
/// Dual-mode and unknown devices fall on the CLASSIC side. No GATT service
/// lookup is done here.
pub fn classify(device_type: DeviceType) -> DeviceTypeTag {
    if device_type == DeviceType::Le {
        DeviceTypeTag::Hm10
    } else {
        DeviceTypeTag::Classic
    }
}

/// Forwards platform scan callbacks to a [`ScanSink`]
pub struct ScanEventAdapter<S> {
    sink: S,
}

impl<S: ScanSink> ScanEventAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Classify `device` and forward `(address, name, tag)` to the sink.
    ///
    /// `rssi` and `scan_record` are received but not inspected.
    pub fn notify_discovered(&self, device: &BluetoothDevice, rssi: i32, scan_record: &[u8]) {
        let device_type = classify(device.device_type);

        s_trace!(
            "📶 {} ({:?}) rssi={} record_len={} -> {}",
            device.address,
            device.device_type,
            rssi,
            scan_record.len(),
            device_type
        );

        self.sink
            .on_le_scan(&device.address, device.name.as_deref(), device_type);
    }
}

impl<S: ScanSink> LeScanCallback for ScanEventAdapter<S> {
    fn on_le_scan(&self, device: &BluetoothDevice, rssi: i32, scan_record: &[u8]) {
        self.notify_discovered(device, rssi, scan_record);
    }
}
