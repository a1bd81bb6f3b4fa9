//! Android JNI interface
//!
//! Native half of `org.LK8000.NativeLeScanCallback`. The Java object carries
//! the sink handle in its `long ptr` field; each `onLeScan(String, String,
//! String)` call is resolved through the sink registry.

use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;

use super::registry::{self, NativeHandle};
use crate::ble::DeviceTypeTag;
use crate::BridgeError;

/// JNI name of the Java callback class
pub const CALLBACK_CLASS: &str = "org/LK8000/NativeLeScanCallback";

/// Java field holding the native handle
const PTR_FIELD: &str = "ptr";

/// `NativeLeScanCallback.onLeScan(String address, String name, String type)`
///
/// Errors are logged and any pending Java exception cleared; nothing is
/// thrown back into the Bluetooth callback thread.
#[no_mangle]
pub extern "C" fn Java_org_LK8000_NativeLeScanCallback_onLeScan(
    mut env: JNIEnv,
    this: JObject,
    address: JString,
    name: JString,
    device_type: JString,
) {
    let result: Result<(), BridgeError> = (|| {
        let handle = callback_handle(&mut env, &this)?;
        let address: String = env.get_string(&address)?.into();
        let name = optional_string(&mut env, &name)?;
        let device_type: String = env.get_string(&device_type)?.into();
        let device_type: DeviceTypeTag = device_type.parse()?;

        registry::dispatch(handle, &address, name.as_deref(), device_type)
    })();

    if let Err(e) = result {
        s_error!("onLeScan failed: {}", e);
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_clear();
        }
    }
}

/// Construct `new NativeLeScanCallback(handle)` for `BluetoothAdapter.startLeScan`
pub fn new_java_callback<'local>(
    env: &mut JNIEnv<'local>,
    handle: NativeHandle,
) -> Result<JObject<'local>, BridgeError> {
    let callback = env.new_object(CALLBACK_CLASS, "(J)V", &[JValue::Long(handle.as_raw())])?;
    s_info!("✅ Created {} for sink {}", CALLBACK_CLASS, handle);
    Ok(callback)
}

fn callback_handle(env: &mut JNIEnv, callback: &JObject) -> Result<NativeHandle, BridgeError> {
    let raw = env.get_field(callback, PTR_FIELD, "J")?.j()?;
    Ok(NativeHandle::from_raw(raw))
}

/// A null Java string becomes `None`
fn optional_string(env: &mut JNIEnv, value: &JString) -> Result<Option<String>, BridgeError> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(env.get_string(value)?.into()))
}
