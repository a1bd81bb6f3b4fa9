//! btleplug discovery source
//!
//! Feeds discovery events from a btleplug central into a [`ScanEventAdapter`],
//! so desktop builds go through the same classification as Android. Scanning
//! itself is started and stopped by the caller.

use super::adapter::{ScanEventAdapter, ScanSink};
use super::device::{BluetoothDevice, DeviceType};
use crate::BridgeError;
use btleplug::api::{Central, CentralEvent, Peripheral, PeripheralProperties};
use btleplug::platform::PeripheralId;
use futures::future::{self, Future};
use futures::stream::{Stream, StreamExt};
use std::fmt;

/// AD type: complete local name
const AD_COMPLETE_LOCAL_NAME: u8 = 0x09;

/// AD type: manufacturer specific data
const AD_MANUFACTURER_DATA: u8 = 0xFF;

/// btleplug only reports LE devices; one that also carries a Class of Device
/// is reachable over BR/EDR too.
pub fn device_from_properties(props: &PeripheralProperties) -> BluetoothDevice {
    let device_type = if props.class.is_some() {
        DeviceType::Dual
    } else {
        DeviceType::Le
    };

    BluetoothDevice::new(props.address.to_string(), props.local_name.clone(), device_type)
}

/// Rebuild a scan record (sequence of AD structures) from parsed properties.
///
/// Structures that would not fit the one-byte length field are skipped.
pub fn encode_scan_record(props: &PeripheralProperties) -> Vec<u8> {
    let mut record = Vec::new();

    if let Some(name) = &props.local_name {
        push_ad_structure(&mut record, AD_COMPLETE_LOCAL_NAME, name.as_bytes());
    }

    let mut company_ids: Vec<&u16> = props.manufacturer_data.keys().collect();
    company_ids.sort();
    for company_id in company_ids {
        let mut payload = company_id.to_le_bytes().to_vec();
        payload.extend_from_slice(&props.manufacturer_data[company_id]);
        push_ad_structure(&mut record, AD_MANUFACTURER_DATA, &payload);
    }

    record
}

fn push_ad_structure(record: &mut Vec<u8>, ad_type: u8, payload: &[u8]) {
    // Length byte covers the type byte plus payload.
    let Ok(len) = u8::try_from(payload.len() + 1) else {
        s_warn!("⚠️ Skipping AD type 0x{:02X}: payload of {} bytes too long", ad_type, payload.len());
        return;
    };
    record.push(len);
    record.push(ad_type);
    record.extend_from_slice(payload);
}

/// Forward one peripheral to the adapter.
///
/// Returns `false` when btleplug has no properties for it yet.
pub async fn forward_peripheral<P, S>(
    adapter: &ScanEventAdapter<S>,
    peripheral: &P,
) -> Result<bool, BridgeError>
where
    P: Peripheral,
    S: ScanSink,
{
    let props = peripheral.properties().await?;
    if props.is_none() {
        s_debug!("🔍 Peripheral {:?} has no properties yet", peripheral.id());
    }
    Ok(forward_properties(adapter, props))
}

/// RSSI reported when btleplug has no reading (HCI "RSSI not available", 0x7F)
pub const RSSI_UNAVAILABLE: i32 = 127;

pub fn scan_rssi(props: &PeripheralProperties) -> i32 {
    props.rssi.map(i32::from).unwrap_or(RSSI_UNAVAILABLE)
}

fn forward_properties<S: ScanSink>(
    adapter: &ScanEventAdapter<S>,
    props: Option<PeripheralProperties>,
) -> bool {
    let Some(props) = props else {
        return false;
    };

    let device = device_from_properties(&props);
    adapter.notify_discovered(&device, scan_rssi(&props), &encode_scan_record(&props));
    true
}

/// Peripheral behind a discovery or update event; other events carry none we forward.
fn discovery_id(event: CentralEvent) -> Option<PeripheralId> {
    match event {
        CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => Some(id),
        _ => None,
    }
}

/// Drain `central`'s event stream, forwarding every discovery and update.
///
/// Returns when the stream ends. A peripheral that cannot be looked up or
/// read is logged and skipped.
pub async fn forward_discoveries<C, S>(
    central: &C,
    adapter: &ScanEventAdapter<S>,
) -> Result<(), BridgeError>
where
    C: Central,
    S: ScanSink,
{
    let events = central.events().await?;
    s_info!("📡 Forwarding BLE discovery events");

    let ids = events.filter_map(|event| future::ready(discovery_id(event)));
    let forwarded = forward_ids(
        ids,
        move |id| async move {
            let peripheral = central.peripheral(&id).await?;
            let props = peripheral.properties().await?;
            Ok::<_, BridgeError>(props)
        },
        adapter,
    )
    .await;

    s_info!("🛑 BLE event stream ended after {} forwarded events", forwarded);
    Ok(())
}

/// Look up and forward each id in turn; returns how many events were forwarded.
async fn forward_ids<I, St, F, Fut, S>(ids: St, mut lookup: F, adapter: &ScanEventAdapter<S>) -> usize
where
    I: fmt::Debug,
    St: Stream<Item = I>,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<Option<PeripheralProperties>, BridgeError>>,
    S: ScanSink,
{
    futures::pin_mut!(ids);
    let mut forwarded = 0;

    while let Some(id) = ids.next().await {
        let label = format!("{:?}", id);
        match lookup(id).await {
            Ok(props) => {
                if forward_properties(adapter, props) {
                    forwarded += 1;
                } else {
                    s_debug!("🔍 Peripheral {} has no properties yet", label);
                }
            }
            Err(e) => {
                // The peripheral can vanish between the event and the lookup.
                s_warn!("⚠️ Peripheral {} not available: {}", label, e);
            }
        }
    }

    forwarded
}
