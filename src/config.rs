use mac_address::MacAddress;
use serde_derive::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub mqtt: MqttConfig,
    pub listen: Option<ListenConfig>,
    pub devices: Vec<DeviceConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub keep_alive_seconds: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListenConfig {
    pub port: Option<u16>,
}

impl ListenConfig {
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(9002)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DeviceConfig {
    pub name: String,
    pub address: MacAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config() {
        let config_str = r#"
            [mqtt]
            host = "localhost"
            port = 1883
            username = "user"
            password = "pass"

            [listen]
            port = 9002

            [[devices]]
            name = "Pixel"
            address = "40:4E:36:AA:BB:CC"

            [[devices]]
            name = "MacBook"
            address = "6C:96:CF:11:22:33"
        "#;
        let config: AppConfig = toml::de::from_str(config_str).unwrap();
        assert!(config.mqtt.host == "localhost");
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].name, "Pixel");
        assert_eq!(config.devices[0].address.to_string(), "40:4E:36:AA:BB:CC");
        assert_eq!(config.listen.unwrap().port_or_default(), 9002);
    }

    #[test]
    fn test_config_defaults() {
        let config_str = r#"
            [mqtt]
            host = "broker.local"

            [[devices]]
            name = "Pixel"
            address = "40:4E:36:AA:BB:CC"
        "#;
        let config: AppConfig = toml::de::from_str(config_str).unwrap();
        assert!(config.mqtt.port.is_none());
        assert!(config.listen.is_none());
        assert_eq!(ListenConfig::default().port_or_default(), 9002);
    }
}
