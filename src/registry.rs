use std::collections::HashMap;

use mac_address::MacAddress;

use crate::config::DeviceConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub address: MacAddress,
}

/// Result of a registry lookup. Unknown addresses get a synthetic placeholder
/// device so they can be logged, but they must never be published.
#[derive(Debug)]
pub enum Lookup<'a> {
    Known(&'a Device),
    Unknown(Device),
}

/// Immutable table of known devices, keyed by hardware address. Built once at
/// startup; only shared references are handed out after that.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<MacAddress, Device>,
}

impl DeviceRegistry {
    pub fn new(configured: &[DeviceConfig]) -> Self {
        let devices = configured
            .iter()
            .map(|d| {
                (
                    d.address,
                    Device {
                        name: d.name.clone(),
                        address: d.address,
                    },
                )
            })
            .collect();
        DeviceRegistry { devices }
    }

    pub fn lookup(&self, address: MacAddress) -> Lookup<'_> {
        match self.devices.get(&address) {
            Some(device) => Lookup::Known(device),
            None => Lookup::Unknown(Device {
                name: format!("unknown device ({address})"),
                address,
            }),
        }
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
