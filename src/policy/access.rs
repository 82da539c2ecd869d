//! Group ordering, country partitioning and the connect gate.

use serde::Serialize;

use super::user::{has_access, UserTier, VpnUser};
use crate::models::{Server, VpnCountry};
use crate::ranking::GroupKind;

/// Order of the tier groups for a user: their own tier's group comes first.
pub fn tier_group_order(tier: UserTier) -> [GroupKind; 3] {
    match tier {
        UserTier::Free => [GroupKind::Free, GroupKind::Plus, GroupKind::Basic],
        UserTier::Basic => [GroupKind::Basic, GroupKind::Free, GroupKind::Plus],
        UserTier::PlusOrAbove => [GroupKind::Plus, GroupKind::Basic, GroupKind::Free],
    }
}

/// Split countries into those with a server the user can access and the rest.
/// Order is preserved on both sides.
pub fn partition_countries<'a>(
    countries: &'a [VpnCountry],
    user: Option<&VpnUser>,
) -> (Vec<&'a VpnCountry>, Vec<&'a VpnCountry>) {
    countries
        .iter()
        .partition(|country| country.has_accessible_server(user))
}

/// Outcome of a connection attempt to a specific server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectDecision {
    Connect,
    /// The server is up but the user's plan does not include it.
    UpgradeRequired,
    /// The server is down for maintenance.
    Maintenance,
}

impl ConnectDecision {
    pub fn code(self) -> i32 {
        match self {
            ConnectDecision::Connect => 0,
            ConnectDecision::UpgradeRequired => 1,
            ConnectDecision::Maintenance => 2,
        }
    }
}

/// Decide whether connecting to `server` may proceed. `None` means the target
/// is resolved later by the connection layer (e.g. a "fastest" profile).
pub fn connect_decision(user: Option<&VpnUser>, server: Option<&Server>) -> ConnectDecision {
    let server = match server {
        Some(server) => server,
        None => return ConnectDecision::Connect,
    };

    if has_access(user, server) && server.online() {
        ConnectDecision::Connect
    } else if server.online() {
        ConnectDecision::UpgradeRequired
    } else {
        ConnectDecision::Maintenance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::server;
    use crate::models::ServerTier;

    #[test]
    fn own_tier_group_comes_first() {
        assert_eq!(
            tier_group_order(UserTier::Free),
            [GroupKind::Free, GroupKind::Plus, GroupKind::Basic]
        );
        assert_eq!(
            tier_group_order(UserTier::Basic),
            [GroupKind::Basic, GroupKind::Free, GroupKind::Plus]
        );
        assert_eq!(
            tier_group_order(UserTier::PlusOrAbove),
            [GroupKind::Plus, GroupKind::Basic, GroupKind::Free]
        );
    }

    #[test]
    fn partition_keeps_order() {
        let countries = vec![
            VpnCountry::new("AT", vec![server("AT#1", "AT", ServerTier::Plus, 1.0)], false),
            VpnCountry::new("JP", vec![server("JP#1", "JP", ServerTier::Free, 1.0)], false),
            VpnCountry::new("NL", vec![server("NL#1", "NL", ServerTier::Free, 1.0)], false),
        ];
        let free = VpnUser::with_max_tier("u", 0);
        let (accessible, premium) = partition_countries(&countries, Some(&free));
        fn flags(list: &[&VpnCountry]) -> Vec<String> {
            list.iter().map(|c| c.flag.clone()).collect()
        }
        assert_eq!(flags(&accessible), vec!["JP", "NL"]);
        assert_eq!(flags(&premium), vec!["AT"]);

        let (accessible, premium) = partition_countries(&countries, None);
        assert!(accessible.is_empty());
        assert_eq!(premium.len(), 3);
    }

    #[test]
    fn connect_gate() {
        let free = VpnUser::with_max_tier("u", 0);
        let free_server = server("SE#1", "SE", ServerTier::Free, 1.0);
        let plus_server = server("SE#2", "SE", ServerTier::Plus, 1.0);
        let plus_offline = server("SE#3", "SE", ServerTier::Plus, 1.0).offline();
        let free_offline = server("SE#4", "SE", ServerTier::Free, 1.0).offline();

        assert_eq!(connect_decision(Some(&free), None), ConnectDecision::Connect);
        assert_eq!(
            connect_decision(Some(&free), Some(&free_server)),
            ConnectDecision::Connect
        );
        assert_eq!(
            connect_decision(Some(&free), Some(&plus_server)),
            ConnectDecision::UpgradeRequired
        );
        assert_eq!(
            connect_decision(Some(&free), Some(&plus_offline)),
            ConnectDecision::Maintenance
        );
        assert_eq!(
            connect_decision(Some(&free), Some(&free_offline)),
            ConnectDecision::Maintenance
        );
        assert_eq!(
            connect_decision(None, Some(&free_server)),
            ConnectDecision::UpgradeRequired
        );
    }
}
