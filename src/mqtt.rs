use std::time::Duration;

use log::{debug, error, info};
use mac_address::MacAddress;
use rumqttc::{MqttOptions, QoS};
use serde_derive::Serialize;

use crate::config::MqttConfig;
use crate::registry::Device;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceState {
    Present,
    Absent,
}

impl PresenceState {
    pub fn payload(self) -> &'static str {
        match self {
            PresenceState::Present => "ON",
            PresenceState::Absent => "OFF",
        }
    }
}

/// Home Assistant MQTT discovery descriptor for a presence binary sensor.
#[derive(Debug, Serialize)]
struct Discovery {
    device_class: &'static str,
    state_topic: String,
    name: String,
    unique_id: String,
    device: DiscoveryDevice,
}

#[derive(Debug, Serialize)]
struct DiscoveryDevice {
    identifiers: String,
    name: String,
    sw_version: String,
    model: &'static str,
    manufacturer: &'static str,
}

#[derive(Debug, Clone)]
pub struct MqttClient {
    client: rumqttc::AsyncClient,
}

impl MqttClient {
    pub fn new(config: &MqttConfig) -> (Self, rumqttc::EventLoop) {
        let client_id = config
            .client_id
            .as_ref()
            .unwrap_or(&"wifi-presence".to_string())
            .to_string();

        let mut mqttoptions =
            MqttOptions::new(client_id, config.host.clone(), config.port.unwrap_or(1883));

        mqttoptions.set_keep_alive(Duration::from_secs(config.keep_alive_seconds.unwrap_or(5)));

        if let (Some(username), Some(password)) =
            (config.username.as_ref(), config.password.as_ref())
        {
            mqttoptions.set_credentials(username.clone(), password.clone());
        }

        let (client, eventloop) = rumqttc::AsyncClient::new(mqttoptions, 10);

        (MqttClient { client }, eventloop)
    }

    /// Poll the event loop until the broker acknowledges the connection. The
    /// process cannot do its job without the bus, so a connect error here is
    /// surfaced to the caller instead of being retried.
    pub async fn wait_connected(
        eventloop: &mut rumqttc::EventLoop,
    ) -> Result<(), rumqttc::ConnectionError> {
        loop {
            if let rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(_)) = eventloop.poll().await? {
                debug!("Connection acknowledged");
                return Ok(());
            }
        }
    }

    /// Keep the rumqttc event loop turning so publishes go out and keep-alives
    /// are answered. Poll errors after the initial connect are logged and the
    /// loop continues; rumqttc reconnects on the next poll.
    pub async fn event_loop(eventloop: &mut rumqttc::EventLoop) {
        loop {
            match eventloop.poll().await {
                Ok(rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(_))) => {
                    debug!("Connection acknowledged");
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Error polling MQTT event loop: {:?}", e);
                }
            }
        }
    }

    /// Announce a configured device to Home Assistant. Retained so the
    /// platform can rediscover the entity after a broker or HA restart.
    pub async fn publish_discovery(&self, device: &Device) -> Result<(), rumqttc::ClientError> {
        let id = entity_id(device);
        let discovery = Discovery {
            device_class: "presence",
            state_topic: state_topic(&device.name),
            name: device.name.clone(),
            unique_id: id.clone(),
            device: DiscoveryDevice {
                identifiers: id,
                name: device.name.clone(),
                sw_version: concat!("wifi-presence ", env!("CARGO_PKG_VERSION")).to_string(),
                model: "Wifi Device",
                manufacturer: "wifi-presence",
            },
        };

        info!("Announcing {} for discovery", device.name);
        self.client
            .publish(
                discovery_topic(device.address),
                QoS::AtMostOnce,
                true,
                serde_json::to_string(&discovery).unwrap(),
            )
            .await
    }

    /// Publish a retained ON/OFF state for a known device.
    pub async fn publish_presence(
        &self,
        device: &Device,
        state: PresenceState,
    ) -> Result<(), rumqttc::ClientError> {
        self.client
            .publish(
                state_topic(&device.name),
                QoS::AtMostOnce,
                true,
                state.payload(),
            )
            .await
    }
}

fn state_topic(name: &str) -> String {
    format!("device/wifi/{name}/status")
}

fn discovery_topic(address: MacAddress) -> String {
    format!("homeassistant/binary_sensor/{}/config", address_id(address))
}

fn entity_id(device: &Device) -> String {
    format!("{}_{}_wifipresence", address_id(device.address), device.name)
}

fn address_id(address: MacAddress) -> String {
    address.to_string().replace(':', "")
}
