//! Logical server and connecting domain models.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{default_true, int_bool};

/// Subscription tier a server is gated behind.
///
/// Ordered so that a user with max tier `n` can use every server whose tier is
/// `<= n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServerTier {
    Free,
    Basic,
    Plus,
    /// Servers reserved for the provider's own staff.
    Internal,
}

impl ServerTier {
    /// Decode the API's numeric tier. Unknown values are treated as internal
    /// so they stay hidden from regular users.
    pub fn from_api(value: i32) -> Self {
        match value {
            0 => ServerTier::Free,
            1 => ServerTier::Basic,
            2 => ServerTier::Plus,
            _ => ServerTier::Internal,
        }
    }

    pub fn as_api(self) -> i32 {
        match self {
            ServerTier::Free => 0,
            ServerTier::Basic => 1,
            ServerTier::Plus => 2,
            ServerTier::Internal => 3,
        }
    }
}

impl Serialize for ServerTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_api())
    }
}

impl<'de> Deserialize<'de> for ServerTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(ServerTier::from_api)
    }
}

/// Feature bitmask of a logical server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerFeatures(pub u32);

impl ServerFeatures {
    pub const SECURE_CORE: u32 = 1;
    pub const TOR: u32 = 1 << 1;
    pub const P2P: u32 = 1 << 2;
    pub const STREAMING: u32 = 1 << 3;
    pub const IPV6: u32 = 1 << 4;
    pub const PARTNERSHIP: u32 = 1 << 5;

    pub fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }
}

/// A physical endpoint behind a logical server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectingDomain {
    #[serde(rename = "EntryIP")]
    pub entry_ip: String,
    #[serde(rename = "Domain")]
    pub entry_domain: String,
    #[serde(rename = "ExitIP", default, skip_serializing_if = "Option::is_none")]
    exit_ip: Option<String>,
    #[serde(rename = "Status", with = "int_bool", default = "default_true")]
    pub is_online: bool,
}

impl ConnectingDomain {
    pub fn new(
        entry_ip: impl Into<String>,
        entry_domain: impl Into<String>,
        exit_ip: Option<String>,
        is_online: bool,
    ) -> Self {
        Self {
            entry_ip: entry_ip.into(),
            entry_domain: entry_domain.into(),
            exit_ip,
            is_online,
        }
    }

    /// Exit IP, falling back to the entry IP when the API omits it.
    pub fn exit_ip(&self) -> &str {
        self.exit_ip.as_deref().unwrap_or(&self.entry_ip)
    }
}

/// A logical VPN server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Server {
    #[serde(rename = "ID")]
    pub server_id: String,
    #[serde(rename = "Name")]
    pub server_name: String,
    pub entry_country: String,
    pub exit_country: String,
    #[serde(default)]
    pub domain: String,
    pub tier: ServerTier,
    #[serde(default)]
    pub features: ServerFeatures,
    #[serde(default)]
    pub city: Option<String>,
    /// Lower is better.
    pub score: f64,
    #[serde(default)]
    pub load: f32,
    #[serde(rename = "Status", with = "int_bool", default = "default_true")]
    pub status: bool,
    #[serde(rename = "Servers", default)]
    pub connecting_domains: Vec<ConnectingDomain>,
}

impl Server {
    pub fn is_free_server(&self) -> bool {
        self.tier == ServerTier::Free
    }

    pub fn is_basic_server(&self) -> bool {
        self.tier == ServerTier::Basic
    }

    pub fn is_plus_server(&self) -> bool {
        self.tier == ServerTier::Plus
    }

    pub fn is_internal_server(&self) -> bool {
        self.tier == ServerTier::Internal
    }

    pub fn is_secure_core(&self) -> bool {
        self.features.contains(ServerFeatures::SECURE_CORE)
    }

    pub fn is_partnership_server(&self) -> bool {
        self.features.contains(ServerFeatures::PARTNERSHIP)
    }

    /// City for display; blank cities count as missing.
    pub fn display_city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    /// Online when the logical server is enabled and at least one of its
    /// connecting domains is up.
    pub fn online(&self) -> bool {
        self.status
            && (self.connecting_domains.is_empty()
                || self.connecting_domains.iter().any(|d| d.is_online))
    }

    /// Whether the client has an endpoint to connect to.
    pub fn is_connectable(&self) -> bool {
        !self.connecting_domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CA_2: &str = r#"{
        "ID": "ca2", "Name": "CA#2", "EntryCountry": "CA", "ExitCountry": "CA",
        "Domain": "ca-02.example.net", "Tier": 1, "Features": 36, "City": "Toronto",
        "Score": 1.25, "Load": 30, "Status": 1,
        "Servers": [
            {"EntryIP": "10.0.0.1", "Domain": "ca-02.example.net", "Status": 0},
            {"EntryIP": "10.0.0.2", "Domain": "ca-02.example.net", "ExitIP": "10.0.1.2", "Status": 1}
        ]
    }"#;

    #[test]
    fn parses_api_logical_server() {
        let server: Server = serde_json::from_str(CA_2).expect("valid server json");
        assert_eq!(server.server_name, "CA#2");
        assert_eq!(server.tier, ServerTier::Basic);
        assert!(server.is_basic_server());
        assert!(server.is_partnership_server());
        assert!(server.features.contains(ServerFeatures::P2P));
        assert!(!server.is_secure_core());
        assert_eq!(server.display_city(), Some("Toronto"));
        assert!(server.online());
        assert_eq!(server.connecting_domains[0].exit_ip(), "10.0.0.1");
        assert_eq!(server.connecting_domains[1].exit_ip(), "10.0.1.2");
    }

    #[test]
    fn offline_when_every_domain_is_down() {
        let mut server: Server = serde_json::from_str(CA_2).unwrap();
        for domain in &mut server.connecting_domains {
            domain.is_online = false;
        }
        assert!(!server.online());

        let mut disabled: Server = serde_json::from_str(CA_2).unwrap();
        disabled.status = false;
        assert!(!disabled.online());
    }

    #[test]
    fn unknown_tier_is_internal() {
        assert_eq!(ServerTier::from_api(3), ServerTier::Internal);
        assert_eq!(ServerTier::from_api(42), ServerTier::Internal);
        assert_eq!(ServerTier::from_api(-1), ServerTier::Internal);
        assert!(ServerTier::Free < ServerTier::Plus);
    }

    #[test]
    fn blank_city_is_not_displayed() {
        let mut server: Server = serde_json::from_str(CA_2).unwrap();
        server.city = Some("  ".to_string());
        assert_eq!(server.display_city(), None);
        server.city = None;
        assert_eq!(server.display_city(), None);
    }

    #[test]
    fn serializes_back_to_wire_names() {
        let server: Server = serde_json::from_str(CA_2).unwrap();
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(value["Name"], "CA#2");
        assert_eq!(value["Tier"], 1);
        assert_eq!(value["Status"], 1);
        assert_eq!(value["Servers"][1]["ExitIP"], "10.0.1.2");
        assert!(value["Servers"][0].get("ExitIP").is_none());
    }
}
