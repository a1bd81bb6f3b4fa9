//! Native sink registry
//!
//! Maps opaque handles to native sinks. A handle is never dereferenced; it is
//! only a key into this table and is passed by value across the boundary.

use crate::ble::{DeviceTypeTag, ScanSink};
use crate::BridgeError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Opaque reference to a native sink. `0` is the null handle and is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(i64);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub fn from_raw(raw: i64) -> Self {
        NativeHandle(raw)
    }

    pub fn as_raw(self) -> i64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct SinkRegistry {
    sinks: Mutex<HashMap<NativeHandle, Arc<dyn ScanSink>>>,
    next_handle: AtomicI64,
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(HashMap::new()),
            next_handle: AtomicI64::new(1),
        }
    }

    /// Register `sink` and return a fresh handle for it. Handles are not reused.
    pub fn register(&self, sink: Arc<dyn ScanSink>) -> NativeHandle {
        let handle = NativeHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.sinks.lock().insert(handle, sink);
        s_debug!("🔗 Registered native sink {}", handle);
        handle
    }

    /// Remove the sink behind `handle`; returns whether one was registered
    pub fn unregister(&self, handle: NativeHandle) -> bool {
        let removed = self.sinks.lock().remove(&handle).is_some();
        if removed {
            s_debug!("🔌 Unregistered native sink {}", handle);
        }
        removed
    }

    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.sinks.lock().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    /// Forward one event to the sink behind `handle`.
    ///
    /// The table lock is released before the sink runs, so a sink may
    /// register or unregister from inside the callback.
    pub fn dispatch(
        &self,
        handle: NativeHandle,
        address: &str,
        name: Option<&str>,
        device_type: DeviceTypeTag,
    ) -> Result<(), BridgeError> {
        let sink = self
            .sinks
            .lock()
            .get(&handle)
            .cloned()
            .ok_or(BridgeError::UnknownHandle(handle.as_raw()))?;

        sink.on_le_scan(address, name, device_type);
        Ok(())
    }
}

lazy_static::lazy_static! {
    static ref SINKS: SinkRegistry = SinkRegistry::new();
}

/// Register a sink in the process-wide registry
pub fn register_sink(sink: Arc<dyn ScanSink>) -> NativeHandle {
    SINKS.register(sink)
}

pub fn unregister_sink(handle: NativeHandle) -> bool {
    SINKS.unregister(handle)
}

/// Forward one event through the process-wide registry
pub fn dispatch(
    handle: NativeHandle,
    address: &str,
    name: Option<&str>,
    device_type: DeviceTypeTag,
) -> Result<(), BridgeError> {
    SINKS.dispatch(handle, address, name, device_type)
}

/// A sink that only holds a handle and resolves it in the process-wide
/// registry on every call. This is what the adapter uses on Android.
#[derive(Debug, Clone, Copy)]
pub struct NativeSink {
    handle: NativeHandle,
}

impl NativeSink {
    pub fn new(handle: NativeHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }
}

impl ScanSink for NativeSink {
    fn on_le_scan(&self, address: &str, name: Option<&str>, device_type: DeviceTypeTag) {
        if let Err(e) = dispatch(self.handle, address, name, device_type) {
            s_warn!("⚠️ Dropping scan result for {}: {}", address, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::DeviceCollector;

    #[test]
    fn test_handles_are_unique_and_non_null() {
        let registry = SinkRegistry::new();
        let a = registry.register(Arc::new(DeviceCollector::new()));
        let b = registry.register(Arc::new(DeviceCollector::new()));

        assert_ne!(a, b);
        assert!(!a.is_null());
        assert!(!b.is_null());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_handles_not_reused_after_unregister() {
        let registry = SinkRegistry::new();
        let a = registry.register(Arc::new(DeviceCollector::new()));
        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));

        let b = registry.register(Arc::new(DeviceCollector::new()));
        assert_ne!(a, b);
        assert!(registry.contains(b));
        assert!(!registry.contains(a));
    }

    #[test]
    fn test_dispatch_reaches_sink() {
        let registry = SinkRegistry::new();
        let collector = Arc::new(DeviceCollector::new());
        let handle = registry.register(collector.clone());

        registry
            .dispatch(handle, "AA:BB:CC:DD:EE:FF", Some("Vario01"), DeviceTypeTag::Hm10)
            .expect("Should dispatch");

        let device = collector.get("AA:BB:CC:DD:EE:FF").expect("Should be collected");
        assert_eq!(device.device_type, DeviceTypeTag::Hm10);
    }

    #[test]
    fn test_dispatch_unknown_handle() {
        let registry = SinkRegistry::new();
        let result = registry.dispatch(NativeHandle::from_raw(99), "AA", None, DeviceTypeTag::Classic);
        assert!(matches!(result, Err(BridgeError::UnknownHandle(99))));

        let result = registry.dispatch(NativeHandle::NULL, "AA", None, DeviceTypeTag::Classic);
        assert!(matches!(result, Err(BridgeError::UnknownHandle(0))));
    }

    #[test]
    fn test_native_sink_drops_unknown_handle() {
        let sink = NativeSink::new(NativeHandle::from_raw(i64::MAX));
        sink.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);
        assert_eq!(sink.handle().as_raw(), i64::MAX);
    }

    #[test]
    fn test_sink_may_unregister_itself() {
        let registry = Arc::new(SinkRegistry::new());
        let slot = Arc::new(Mutex::new(NativeHandle::NULL));

        let registry_clone = registry.clone();
        let slot_clone = slot.clone();
        let handle = registry.register(Arc::new(crate::ble::FnSink(
            move |_address: &str, _name: Option<&str>, _tag: DeviceTypeTag| {
                registry_clone.unregister(*slot_clone.lock());
            },
        )));
        *slot.lock() = handle;

        registry
            .dispatch(handle, "AA", None, DeviceTypeTag::Hm10)
            .expect("Should dispatch");
        assert!(!registry.contains(handle));
    }

    #[test]
    fn test_native_handle_display() {
        assert_eq!(NativeHandle::from_raw(7).to_string(), "#7");
    }
}
