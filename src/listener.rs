use log::{debug, error, info};
use tokio::net::UdpSocket;

use crate::mqtt::{MqttClient, PresenceState};
use crate::parser::{self, Classification};
use crate::registry::{Device, DeviceRegistry, Lookup};

/// Outcome of evaluating one received line against the registry. Only
/// `Publish` reaches the bus; everything else is logged and dropped.
#[derive(Debug, PartialEq)]
enum Decision<'a> {
    Publish {
        device: &'a Device,
        state: PresenceState,
    },
    UnknownDevice {
        device: Device,
        state: PresenceState,
    },
    NoAddress(PresenceState),
    Skip,
}

fn evaluate<'a>(registry: &'a DeviceRegistry, line: &str) -> Decision<'a> {
    let state = match parser::classify(line) {
        Classification::Connected => PresenceState::Present,
        Classification::Disconnected => PresenceState::Absent,
        Classification::Unrecognized => return Decision::Skip,
    };

    let Some(address) = parser::extract_address(line) else {
        return Decision::NoAddress(state);
    };

    match registry.lookup(address) {
        Lookup::Known(device) => Decision::Publish { device, state },
        Lookup::Unknown(device) => Decision::UnknownDevice { device, state },
    }
}

fn transition_label(state: PresenceState) -> &'static str {
    match state {
        PresenceState::Present => "[+]",
        PresenceState::Absent => "[-]",
    }
}

/// Owns the datagram socket and drives the pipeline: one blocking receive at a
/// time, no queueing between stages.
pub struct Listener {
    socket: UdpSocket,
    registry: DeviceRegistry,
    mqtt: MqttClient,
}

impl Listener {
    pub fn new(socket: UdpSocket, registry: DeviceRegistry, mqtt: MqttClient) -> Self {
        Listener {
            socket,
            registry,
            mqtt,
        }
    }

    pub async fn run(&self) {
        // Payloads larger than this are truncated, not reassembled.
        let mut buf = [0u8; 1024];

        loop {
            let len = match self.socket.recv_from(&mut buf).await {
                Ok((len, _)) => len,
                Err(e) => {
                    // A transient receive failure must not take the listener down.
                    error!("Error receiving datagram: {:?}", e);
                    continue;
                }
            };

            let line = String::from_utf8_lossy(&buf[..len]);
            self.handle_line(&line).await;
        }
    }

    async fn handle_line(&self, line: &str) {
        match evaluate(&self.registry, line) {
            Decision::Publish { device, state } => {
                info!("{} {}", transition_label(state), device.name);
                if let Err(e) = self.mqtt.publish_presence(device, state).await {
                    error!("Error publishing presence for {}: {:?}", device.name, e);
                }
            }
            Decision::UnknownDevice { device, state } => {
                // Visible to the operator, but never placed on the bus.
                info!("{} {}", transition_label(state), device.name);
            }
            Decision::NoAddress(_) => {
                debug!("No hardware address in line: {}", line);
            }
            Decision::Skip => {
                debug!("[?] {}", line);
            }
        }
    }
}
