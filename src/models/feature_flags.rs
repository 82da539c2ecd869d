//! Client feature flags from the client config endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(rename = "NetShield", default)]
    pub net_shield: i32,
    #[serde(rename = "GuestHoles", default)]
    pub guest_holes: i32,
}

impl FeatureFlags {
    pub fn net_shield_enabled(&self) -> bool {
        self.net_shield != 0
    }

    pub fn guest_hole_enabled(&self) -> bool {
        self.guest_holes != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_default_to_disabled() {
        let flags: FeatureFlags = serde_json::from_str("{}").unwrap();
        assert!(!flags.net_shield_enabled());
        assert!(!flags.guest_hole_enabled());

        let flags: FeatureFlags = serde_json::from_str(r#"{"NetShield":2,"GuestHoles":1}"#).unwrap();
        assert!(flags.net_shield_enabled());
        assert!(flags.guest_hole_enabled());
    }
}
