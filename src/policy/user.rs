//! The cached VPN user and their subscription tier.

use serde::{Deserialize, Serialize};

use crate::models::Server;

/// Subscription level as far as server list presentation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    Free,
    Basic,
    PlusOrAbove,
}

impl UserTier {
    pub fn from_max_tier(max_tier: i32) -> Self {
        match max_tier {
            i32::MIN..=0 => UserTier::Free,
            1 => UserTier::Basic,
            _ => UserTier::PlusOrAbove,
        }
    }
}

/// VPN account details relevant to server access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnUser {
    pub user_id: String,
    /// Highest server tier the plan unlocks (0 free, 1 basic, 2 plus, 3 internal).
    pub max_tier: i32,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub max_connect: i32,
}

impl VpnUser {
    pub fn with_max_tier(user_id: impl Into<String>, max_tier: i32) -> Self {
        Self {
            user_id: user_id.into(),
            max_tier,
            plan_name: None,
            max_connect: 1,
        }
    }

    pub fn tier(&self) -> UserTier {
        UserTier::from_max_tier(self.max_tier)
    }

    pub fn is_free_user(&self) -> bool {
        self.tier() == UserTier::Free
    }

    pub fn is_basic_user(&self) -> bool {
        self.tier() == UserTier::Basic
    }

    pub fn is_user_plus_or_above(&self) -> bool {
        self.tier() == UserTier::PlusOrAbove
    }

    pub fn has_access_to_server(&self, server: &Server) -> bool {
        self.max_tier >= server.tier.as_api()
    }
}

/// Access check for an optional (not yet loaded) user. No user, no access.
pub fn has_access(user: Option<&VpnUser>, server: &Server) -> bool {
    user.map_or(false, |u| u.has_access_to_server(server))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::server;
    use crate::models::ServerTier;

    #[test]
    fn tier_from_max_tier() {
        assert_eq!(UserTier::from_max_tier(-1), UserTier::Free);
        assert_eq!(UserTier::from_max_tier(0), UserTier::Free);
        assert_eq!(UserTier::from_max_tier(1), UserTier::Basic);
        assert_eq!(UserTier::from_max_tier(2), UserTier::PlusOrAbove);
        assert_eq!(UserTier::from_max_tier(3), UserTier::PlusOrAbove);
    }

    #[test]
    fn access_follows_max_tier() {
        let basic = VpnUser::with_max_tier("u", 1);
        assert!(basic.is_basic_user());
        assert!(basic.has_access_to_server(&server("A#1", "CH", ServerTier::Free, 1.0)));
        assert!(basic.has_access_to_server(&server("A#2", "CH", ServerTier::Basic, 1.0)));
        assert!(!basic.has_access_to_server(&server("A#3", "CH", ServerTier::Plus, 1.0)));

        let plus = VpnUser::with_max_tier("u", 2);
        assert!(!plus.has_access_to_server(&server("A#4", "CH", ServerTier::Internal, 1.0)));
        let staff = VpnUser::with_max_tier("u", 3);
        assert!(staff.has_access_to_server(&server("A#4", "CH", ServerTier::Internal, 1.0)));
    }

    #[test]
    fn parses_user_json() {
        let user: VpnUser =
            serde_json::from_str(r#"{"userId":"abc","maxTier":2,"planName":"vpnplus"}"#).unwrap();
        assert!(user.is_user_plus_or_above());
        assert_eq!(user.plan_name.as_deref(), Some("vpnplus"));
        assert_eq!(user.max_connect, 0);
        assert!(!has_access(None, &server("A#1", "CH", ServerTier::Free, 1.0)));
    }
}
