use std::sync::LazyLock;

use mac_address::MacAddress;
use regex::Regex;

static MAC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9a-f]{2}[:-]){5}[0-9a-f]{2}").unwrap());

/// Pull the first hardware address token out of a log line. Accepts mixed-case
/// hex and either `:` or `-` as the delimiter; the returned address displays in
/// canonical uppercase colon-separated form.
pub fn extract_address(line: &str) -> Option<MacAddress> {
    let token = MAC_PATTERN.find(line)?.as_str().replace('-', ":");
    token.parse().ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Connected,
    Disconnected,
    Unrecognized,
}

/// Classify a log line by its lifecycle marker. The disconnect rule is checked
/// first: " connected" is a substring of " disconnected", so the order of
/// these checks is load-bearing.
pub fn classify(line: &str) -> Classification {
    if line.contains(" disconnected") {
        Classification::Disconnected
    } else if line.contains(" connected") {
        Classification::Connected
    } else {
        Classification::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_colon_delimited_address() {
        let mac = extract_address("wlan0: STA 40:4e:36:aa:bb:cc connected").unwrap();
        assert_eq!(mac.to_string(), "40:4E:36:AA:BB:CC");
    }

    #[test]
    fn extracts_hyphen_delimited_address() {
        let mac = extract_address("STA 6c-96-cf-11-22-33 authorized").unwrap();
        assert_eq!(mac.to_string(), "6C:96:CF:11:22:33");
    }

    #[test]
    fn first_address_wins() {
        let mac = extract_address("ap AA:BB:CC:DD:EE:FF saw 40:4E:36:AA:BB:CC").unwrap();
        assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn no_address_in_plain_text() {
        assert!(extract_address("random system message").is_none());
        assert!(extract_address("").is_none());
        // Too few groups
        assert!(extract_address("ip 40:4e:36:aa:bb").is_none());
    }

    #[test]
    fn classifies_connect_and_disconnect() {
        assert_eq!(
            classify("STA 40:4e:36:aa:bb:cc connected to wlan0"),
            Classification::Connected
        );
        assert_eq!(
            classify("STA 40:4e:36:aa:bb:cc disconnected from wlan0"),
            Classification::Disconnected
        );
    }

    #[test]
    fn disconnect_marker_beats_connect_substring() {
        // " connected" matches inside " disconnected"; must not misclassify.
        assert_eq!(
            classify("device disconnected"),
            Classification::Disconnected
        );
    }

    #[test]
    fn noise_lines_are_unrecognized() {
        assert_eq!(classify("random system message"), Classification::Unrecognized);
        assert_eq!(classify(""), Classification::Unrecognized);
        // No leading space before the marker
        assert_eq!(classify("preconnected"), Classification::Unrecognized);
    }
}
