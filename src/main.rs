use std::fs::File;
use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use log::info;
use tokio::net::UdpSocket;

mod config;
mod listener;
mod mqtt;
mod parser;
mod registry;

#[derive(Parser, Debug)]
#[command(about = "Bridge AP connectivity logs into Home Assistant presence sensors")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let mut file = File::open(&args.config)
        .with_context(|| format!("failed to open {}", args.config.display()))?;
    let mut config_contents = String::new();
    file.read_to_string(&mut config_contents)?;

    let config: config::AppConfig = toml::de::from_str(&config_contents)
        .with_context(|| format!("failed to parse {}", args.config.display()))?;

    let registry = registry::DeviceRegistry::new(&config.devices);
    info!("Watching {} devices", registry.len());

    let (mqtt_client, mut eventloop) = mqtt::MqttClient::new(&config.mqtt);
    mqtt::MqttClient::wait_connected(&mut eventloop)
        .await
        .context("failed to connect to MQTT broker")?;

    tokio::task::spawn(async move {
        mqtt::MqttClient::event_loop(&mut eventloop).await;
    });

    let port = config.listen.unwrap_or_default().port_or_default();
    let socket = UdpSocket::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind UDP port {port}"))?;
    info!("Listening on UDP port {}", port);

    for device in registry.devices() {
        mqtt_client
            .publish_discovery(device)
            .await
            .with_context(|| format!("failed to publish discovery for {}", device.name))?;
    }

    let listener = listener::Listener::new(socket, registry, mqtt_client);
    listener.run().await;

    Ok(())
}
