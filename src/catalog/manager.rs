//! Server catalog snapshot and best-score queries.

use std::collections::BTreeMap;

use super::source::ServerListSource;
use crate::logging::LogCategory;
use crate::models::{Server, VpnCountry};
use crate::policy::user::has_access;
use crate::policy::VpnUser;

/// Lowest-score server among `servers` that is online and accessible to the
/// user. Ties keep the first candidate. Offline servers are never returned.
pub fn best_score_server<'a, I>(servers: I, user: Option<&VpnUser>) -> Option<&'a Server>
where
    I: IntoIterator<Item = &'a Server>,
{
    servers
        .into_iter()
        .filter(|s| s.online() && has_access(user, s))
        .fold(None, |best: Option<&'a Server>, candidate| match best {
            Some(current) if current.score.total_cmp(&candidate.score).is_le() => Some(current),
            _ => Some(candidate),
        })
}

/// Known countries and servers.
pub struct ServerCatalog {
    servers: Vec<Server>,
    vpn_countries: Vec<VpnCountry>,
    secure_core_entry_countries: Vec<VpnCountry>,
    secure_core_exit_countries: Vec<VpnCountry>,
    server_list_version: u64,
    pub source: ServerListSource,
}

impl ServerCatalog {
    /// Create an empty catalog (loading state)
    pub fn new_empty() -> Self {
        Self {
            servers: Vec::new(),
            vpn_countries: Vec::new(),
            secure_core_entry_countries: Vec::new(),
            secure_core_exit_countries: Vec::new(),
            server_list_version: 0,
            source: ServerListSource::Loading,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Replace the snapshot and rebuild the country indexes.
    pub fn set_servers(&mut self, servers: Vec<Server>, source: ServerListSource) {
        let (secure_core, regular): (Vec<&Server>, Vec<&Server>) =
            servers.iter().partition(|s| s.is_secure_core());

        self.vpn_countries = group_by_country(regular.iter().copied(), |s| &s.exit_country, false);
        self.secure_core_exit_countries =
            group_by_country(secure_core.iter().copied(), |s| &s.exit_country, true);
        self.secure_core_entry_countries =
            group_by_country(secure_core.iter().copied(), |s| &s.entry_country, true);

        log::info!(
            target: LogCategory::Api.target(),
            "Server list updated from {}: {} servers, {} countries, {} secure core exits",
            source,
            servers.len(),
            self.vpn_countries.len(),
            self.secure_core_exit_countries.len()
        );

        self.servers = servers;
        self.source = source;
        self.server_list_version += 1;
    }

    /// Incremented on every `set_servers`.
    pub fn server_list_version(&self) -> u64 {
        self.server_list_version
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn vpn_countries(&self) -> &[VpnCountry] {
        &self.vpn_countries
    }

    pub fn secure_core_exit_countries(&self) -> &[VpnCountry] {
        &self.secure_core_exit_countries
    }

    pub fn secure_core_entry_countries(&self) -> &[VpnCountry] {
        &self.secure_core_entry_countries
    }

    /// Countries shown in the country list for the current routing mode.
    pub fn countries_for_list(&self, secure_core: bool) -> &[VpnCountry] {
        if secure_core {
            &self.secure_core_exit_countries
        } else {
            &self.vpn_countries
        }
    }

    pub fn vpn_entry_country(&self, code: &str, secure_core: bool) -> Option<&VpnCountry> {
        let countries = if secure_core {
            &self.secure_core_entry_countries
        } else {
            &self.vpn_countries
        };
        find_country(countries, code)
    }

    pub fn vpn_exit_country(&self, code: &str, secure_core: bool) -> Option<&VpnCountry> {
        find_country(self.countries_for_list(secure_core), code)
    }

    pub fn server_by_name(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.server_name == name)
    }

    pub fn server_by_id(&self, id: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.server_id == id)
    }

    /// Best-score connectable server of a country.
    pub fn best_score_server_in<'a>(
        &self,
        country: &'a VpnCountry,
        user: Option<&VpnUser>,
    ) -> Option<&'a Server> {
        best_score_server(country.connectable_servers(), user)
    }

    /// Best-score server across all regular (non secure core) countries.
    pub fn best_score_server_overall(&self, user: Option<&VpnUser>) -> Option<&Server> {
        best_score_server(
            self.vpn_countries
                .iter()
                .flat_map(|c| c.connectable_servers()),
            user,
        )
    }
}

impl Default for ServerCatalog {
    fn default() -> Self {
        Self::new_empty()
    }
}

fn find_country<'a>(countries: &'a [VpnCountry], code: &str) -> Option<&'a VpnCountry> {
    countries
        .iter()
        .find(|c| c.flag.eq_ignore_ascii_case(code))
}

/// Group servers by a country code, keeping API order within each country and
/// sorting countries by code.
fn group_by_country<'a, I, F>(servers: I, key: F, secure_core: bool) -> Vec<VpnCountry>
where
    I: Iterator<Item = &'a Server>,
    F: Fn(&Server) -> &String,
{
    let mut grouped: BTreeMap<String, Vec<Server>> = BTreeMap::new();
    for server in servers {
        grouped
            .entry(key(server).to_uppercase())
            .or_default()
            .push(server.clone());
    }
    grouped
        .into_iter()
        .map(|(flag, servers)| VpnCountry::new(flag, servers, secure_core))
        .collect()
}
