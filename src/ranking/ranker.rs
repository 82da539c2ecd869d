//! Grouping and ordering of a country's servers for the server list.
//!
//! Classic view, top to bottom:
//! 1. internal servers (only present for staff accounts' data),
//! 2. the single best-score server,
//! 3. free/basic/plus groups, the user's own tier first.
//!
//! Within every group servers are ordered by partnership (partner servers
//! last), then by city (servers without a city last), then by city name.
//! Secure core mode skips all of this and lists the exit country's servers
//! as one untitled group.

use std::cmp::Ordering;

use super::groups::{GroupKind, InfoType, ServersGroup};
use crate::catalog::best_score_server;
use crate::logging::LogCategory;
use crate::metadata::{PartnershipLookup, StreamingLookup};
use crate::models::{Server, VpnCountry};
use crate::policy::{tier_group_order, VpnUser};

/// Everything the ranker needs besides the servers themselves.
#[derive(Clone, Copy, Default)]
pub struct RankingContext<'a> {
    /// The cached VPN user, if known.
    pub user: Option<&'a VpnUser>,
    pub secure_core: bool,
    pub partnerships: Option<&'a dyn PartnershipLookup>,
    pub streaming: Option<&'a dyn StreamingLookup>,
}

fn display_order(a: &Server, b: &Server) -> Ordering {
    a.is_partnership_server()
        .cmp(&b.is_partnership_server())
        .then_with(|| {
            a.display_city()
                .is_none()
                .cmp(&b.display_city().is_none())
        })
        .then_with(|| a.display_city().cmp(&b.display_city()))
}

/// Stable sort into display order.
pub fn sort_for_display(servers: &mut [&Server]) {
    servers.sort_by(|a, b| display_order(a, b));
}

fn bucket<'a>(servers: &[&'a Server], keep: impl Fn(&Server) -> bool) -> Vec<&'a Server> {
    servers.iter().copied().filter(|s| keep(s)).collect()
}

/// Ordered display groups for one country. Empty groups are omitted.
pub fn servers_for_country<'a>(
    country: &'a VpnCountry,
    ctx: &RankingContext<'_>,
) -> Vec<ServersGroup<'a>> {
    if ctx.secure_core {
        return vec![ServersGroup::untitled(country.connectable_servers())];
    }

    let mut servers = country.connectable_servers();
    sort_for_display(&mut servers);

    let free = bucket(&servers, Server::is_free_server);
    let basic = bucket(&servers, Server::is_basic_server);
    let plus = bucket(&servers, Server::is_plus_server);
    let internal = bucket(&servers, Server::is_internal_server);
    let fastest = best_score_server(servers.iter().copied(), ctx.user);

    let mut groups = Vec::new();
    if !internal.is_empty() {
        groups.push(ServersGroup::titled(GroupKind::Internal, internal, None));
    }
    if let Some(fastest) = fastest {
        groups.push(ServersGroup::titled(GroupKind::Fastest, vec![fastest], None));
    }

    let free_info = ctx
        .partnerships
        .filter(|lookup| lookup.has_any_partnership(country))
        .map(|_| InfoType::Partners {
            country: country.flag.clone(),
            secure_core: ctx.secure_core,
        });
    let plus_info = ctx
        .streaming
        .filter(|lookup| lookup.has_streaming_services(&country.flag))
        .map(|_| InfoType::Streaming {
            country: country.flag.clone(),
        });

    if let Some(user) = ctx.user {
        for kind in tier_group_order(user.tier()) {
            let (servers, info) = match kind {
                GroupKind::Free => (&free, free_info.clone()),
                GroupKind::Basic => (&basic, None),
                GroupKind::Plus => (&plus, plus_info.clone()),
                GroupKind::Internal | GroupKind::Fastest => continue,
            };
            if !servers.is_empty() {
                groups.push(ServersGroup::titled(kind, servers.clone(), info));
            }
        }
    }

    log::debug!(
        target: LogCategory::Ui.target(),
        "Ranked {} servers of {} into {} groups",
        servers.len(),
        country.flag,
        groups.len()
    );

    groups
}
