//! FFI module for platform integration
//!
//! Native sinks are registered here and referred to by an opaque handle, which
//! is what crosses the JNI boundary. On Android the `android` module provides
//! the native half of `org.LK8000.NativeLeScanCallback`.

#[cfg(feature = "android")]
pub mod android;
pub mod registry;

#[cfg(feature = "android")]
pub use android::*;
pub use registry::{
    dispatch, register_sink, unregister_sink, NativeHandle, NativeSink, SinkRegistry,
};
