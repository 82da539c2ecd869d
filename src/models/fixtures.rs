//! Server builders shared by unit tests.

use super::{ConnectingDomain, Server, ServerFeatures, ServerTier};

pub(crate) fn server(name: &str, country: &str, tier: ServerTier, score: f64) -> Server {
    let domain = format!("{}.example.net", name.to_lowercase().replace('#', "-"));
    Server {
        server_id: format!("id-{}", name),
        server_name: name.to_string(),
        entry_country: country.to_string(),
        exit_country: country.to_string(),
        domain: domain.clone(),
        tier,
        features: ServerFeatures::default(),
        city: None,
        score,
        load: 10.0,
        status: true,
        connecting_domains: vec![ConnectingDomain::new("10.0.0.1", domain, None, true)],
    }
}

impl Server {
    pub(crate) fn offline(mut self) -> Self {
        self.status = false;
        self
    }

    pub(crate) fn in_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub(crate) fn partnership(mut self) -> Self {
        self.features.0 |= ServerFeatures::PARTNERSHIP;
        self
    }

    /// Turn into a secure core server entering through `entry`.
    pub(crate) fn via_secure_core(mut self, entry: &str) -> Self {
        self.features.0 |= ServerFeatures::SECURE_CORE;
        self.entry_country = entry.to_string();
        self
    }
}
