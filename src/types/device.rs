// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device descriptors embedded in the gateway's device listing page.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One controllable endpoint, as described by the gateway.
///
/// The listing page embeds these as JSON objects like:
///
/// ```json
/// {"nodeId":"268566528","eoj":"0x026301","type":"0x0e","agree":"0x31",
///  "name":"Garage","state":"0x30","entry":"1",
///  "shutter":{"openState":"0x43","type":"0x1010","version":"1"},
///  "condition":"Opening"}
/// ```
///
/// # Examples
///
/// ```
/// use aiseg2_lib::types::Device;
///
/// let json = r#"{"nodeId":"1","eoj":"0x026301","type":"0x0e","name":"Garage"}"#;
/// let device: Device = serde_json::from_str(json).unwrap();
/// assert_eq!(device.name, "Garage");
/// assert!(device.shutter.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device handle.
    pub node_id: String,
    /// Hex-encoded object identifier of the controlled function.
    pub eoj: String,
    /// Hex-encoded device class.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Display label.
    pub name: String,
    /// Opaque pass-through value.
    #[serde(default, deserialize_with = "opaque")]
    pub agree: String,
    /// Opaque pass-through value.
    #[serde(default, deserialize_with = "opaque")]
    pub state: String,
    /// Opaque pass-through value.
    #[serde(default, deserialize_with = "opaque")]
    pub entry: String,
    /// Shutter specific state, present only for shutter-class devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter: Option<ShutterInfo>,
    /// Human-readable current state.
    #[serde(default, deserialize_with = "opaque")]
    pub condition: String,
}

impl Device {
    /// Returns the hardware identity of this device.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        DeviceId {
            node_id: self.node_id.clone(),
            eoj: self.eoj.clone(),
        }
    }

    /// Returns `true` if the gateway reported shutter state for this device.
    #[must_use]
    pub fn is_shutter(&self) -> bool {
        self.shutter.is_some()
    }
}

/// Shutter sub-record of a [`Device`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterInfo {
    /// Opaque open/closed state code.
    #[serde(default, deserialize_with = "opaque")]
    pub open_state: String,
    /// Opaque shutter model code.
    #[serde(rename = "type", default, deserialize_with = "opaque")]
    pub shutter_type: String,
    /// Opaque firmware version.
    #[serde(default, deserialize_with = "opaque")]
    pub version: String,
}

/// Accepts any JSON value for a field the gateway does not type consistently.
///
/// `null` becomes the empty string, strings are kept, and any other value
/// keeps its JSON text.
fn opaque<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Hardware identity of a device: `nodeId` plus `eoj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId {
    /// Device handle.
    pub node_id: String,
    /// Object identifier.
    pub eoj: String,
}

/// Devices scraped from one fetch of the listing page.
///
/// Lookup is by display name, which the gateway does not keep unique: when
/// two descriptors share a name, the later one in document order wins the
/// name slot. Every descriptor stays reachable through [`iter`](Self::iter)
/// and [`get_by_id`](Self::get_by_id).
///
/// # Examples
///
/// ```
/// use aiseg2_lib::types::{Device, DeviceListing};
///
/// let json = r#"[
///     {"nodeId":"1","eoj":"0x026301","type":"0x0e","name":"Garage"},
///     {"nodeId":"2","eoj":"0x026301","type":"0x0e","name":"Garage"}
/// ]"#;
/// let devices: Vec<Device> = serde_json::from_str(json).unwrap();
/// let listing = DeviceListing::from_devices(devices);
///
/// assert_eq!(listing.len(), 1);
/// assert_eq!(listing.get("Garage").unwrap().node_id, "2");
/// assert_eq!(listing.iter().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceListing {
    devices: Vec<Device>,
    by_name: HashMap<String, usize>,
}

impl DeviceListing {
    /// Builds a listing from descriptors in document order.
    #[must_use]
    pub fn from_devices(devices: Vec<Device>) -> Self {
        let mut by_name = HashMap::with_capacity(devices.len());
        for (index, device) in devices.iter().enumerate() {
            match by_name.entry(device.name.clone()) {
                Entry::Occupied(mut slot) => {
                    let previous: &Device = &devices[*slot.get()];
                    tracing::warn!(
                        name = %device.name,
                        replaced_node_id = %previous.node_id,
                        node_id = %device.node_id,
                        "Duplicate device name, later descriptor takes the name"
                    );
                    slot.insert(index);
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }
        Self { devices, by_name }
    }

    /// Returns the device registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Device> {
        self.by_name.get(name).map(|&index| &self.devices[index])
    }

    /// Returns the device with the given hardware identity.
    #[must_use]
    pub fn get_by_id(&self, id: &DeviceId) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.node_id == id.node_id && d.eoj == id.eoj)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if the page listed no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates over the distinct names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Iterates over every descriptor in document order, including ones
    /// whose name was taken by a later descriptor.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Converts into a plain name map.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, Device> {
        let mut map = HashMap::with_capacity(self.by_name.len());
        for device in self.devices {
            map.insert(device.name.clone(), device);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(node_id: &str, name: &str) -> Device {
        Device {
            node_id: node_id.to_string(),
            eoj: "0x026301".to_string(),
            device_type: "0x0e".to_string(),
            name: name.to_string(),
            agree: String::new(),
            state: String::new(),
            entry: String::new(),
            shutter: None,
            condition: String::new(),
        }
    }

    #[test]
    fn deserialize_full_descriptor() {
        let json = r#"{
            "nodeId": "268566528",
            "eoj": "0x026301",
            "type": "0x0e",
            "agree": "0x31",
            "name": "Garage",
            "state": "0x30",
            "entry": "1",
            "shutter": {"openState": "0x43", "type": "0x1010", "version": "1"},
            "condition": "Opening"
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();

        assert_eq!(device.node_id, "268566528");
        assert_eq!(device.device_type, "0x0e");
        assert_eq!(device.agree, "0x31");
        let shutter = device.shutter.as_ref().unwrap();
        assert_eq!(shutter.open_state, "0x43");
        assert_eq!(shutter.shutter_type, "0x1010");
        assert_eq!(shutter.version, "1");
        assert!(device.is_shutter());
    }

    #[test]
    fn opaque_fields_accept_any_json_value() {
        let json = r#"{
            "nodeId": "1",
            "eoj": "0x026301",
            "type": "0x0e",
            "name": "Garage",
            "agree": true,
            "entry": 1,
            "state": null,
            "shutter": {"openState": 67, "type": null, "version": 1.5},
            "condition": null
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();

        assert_eq!(device.agree, "true");
        assert_eq!(device.entry, "1");
        assert_eq!(device.state, "");
        assert_eq!(device.condition, "");
        let shutter = device.shutter.unwrap();
        assert_eq!(shutter.open_state, "67");
        assert_eq!(shutter.shutter_type, "");
        assert_eq!(shutter.version, "1.5");
    }

    #[test]
    fn identity_fields_stay_strict() {
        let json = r#"{"nodeId":1,"eoj":"0x026301","type":"0x0e","name":"Garage"}"#;
        assert!(serde_json::from_str::<Device>(json).is_err());
    }

    #[test]
    fn later_descriptor_takes_the_name() {
        let listing =
            DeviceListing::from_devices(vec![device("1", "Garage"), device("2", "Garage")]);

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("Garage").unwrap().node_id, "2");
    }

    #[test]
    fn shadowed_descriptor_reachable_by_id() {
        let listing =
            DeviceListing::from_devices(vec![device("1", "Garage"), device("2", "Garage")]);
        let id = DeviceId {
            node_id: "1".to_string(),
            eoj: "0x026301".to_string(),
        };

        assert_eq!(listing.get_by_id(&id).unwrap().node_id, "1");
    }

    #[test]
    fn into_map_keeps_last_per_name() {
        let map = DeviceListing::from_devices(vec![
            device("1", "Garage"),
            device("3", "Bedroom"),
            device("2", "Garage"),
        ])
        .into_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map["Garage"].node_id, "2");
        assert_eq!(map["Bedroom"].node_id, "3");
    }

    #[test]
    fn empty_listing() {
        let listing = DeviceListing::default();
        assert!(listing.is_empty());
        assert!(listing.get("Garage").is_none());
    }
}
