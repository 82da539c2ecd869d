//! A country with its servers.

use serde::Serialize;

use super::Server;
use crate::policy::VpnUser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VpnCountry {
    /// ISO country code, used as the flag identifier.
    pub flag: String,
    servers: Vec<Server>,
    pub secure_core: bool,
}

impl VpnCountry {
    pub fn new(flag: impl Into<String>, servers: Vec<Server>, secure_core: bool) -> Self {
        Self {
            flag: flag.into(),
            servers,
            secure_core,
        }
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Servers that expose at least one connecting domain, in API order.
    pub fn connectable_servers(&self) -> Vec<&Server> {
        self.servers.iter().filter(|s| s.is_connectable()).collect()
    }

    pub fn has_accessible_server(&self, user: Option<&VpnUser>) -> bool {
        match user {
            Some(user) => self.servers.iter().any(|s| user.has_access_to_server(s)),
            None => false,
        }
    }

    pub fn has_accessible_online_server(&self, user: Option<&VpnUser>) -> bool {
        match user {
            Some(user) => self
                .servers
                .iter()
                .any(|s| s.online() && user.has_access_to_server(s)),
            None => false,
        }
    }

    /// Every server in the country is offline.
    pub fn is_under_maintenance(&self) -> bool {
        !self.servers.iter().any(Server::online)
    }
}
