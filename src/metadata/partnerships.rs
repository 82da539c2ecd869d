//! Partner servers lookup.

use std::collections::HashMap;

use crate::models::{Partner, PartnerType, Server, VpnCountry};

pub trait PartnershipLookup {
    /// Whether any server in the country is run with a partner.
    fn has_any_partnership(&self, country: &VpnCountry) -> bool;

    /// Partners running the given server.
    fn server_partnerships(&self, server: &Server) -> Vec<&Partner>;
}

#[derive(Debug, Clone, Default)]
pub struct PartnershipsRepository {
    partner_types: Vec<PartnerType>,
    /// Logical server ID -> (partner type index, partner index).
    by_server: HashMap<String, Vec<(usize, usize)>>,
}

impl PartnershipsRepository {
    pub fn new(partner_types: Vec<PartnerType>) -> Self {
        let mut by_server: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        for (type_idx, partner_type) in partner_types.iter().enumerate() {
            for (partner_idx, partner) in partner_type.partners.iter().enumerate() {
                for logical_id in &partner.logical_ids {
                    by_server
                        .entry(logical_id.clone())
                        .or_default()
                        .push((type_idx, partner_idx));
                }
            }
        }

        log::debug!(
            target: crate::logging::LogCategory::Api.target(),
            "Loaded {} partner types covering {} servers",
            partner_types.len(),
            by_server.len()
        );

        Self {
            partner_types,
            by_server,
        }
    }
}

impl PartnershipLookup for PartnershipsRepository {
    fn has_any_partnership(&self, country: &VpnCountry) -> bool {
        country
            .servers()
            .iter()
            .any(|s| self.by_server.contains_key(&s.server_id))
    }

    fn server_partnerships(&self, server: &Server) -> Vec<&Partner> {
        self.by_server
            .get(&server.server_id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|&(type_idx, partner_idx)| {
                        &self.partner_types[type_idx].partners[partner_idx]
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::server;
    use crate::models::ServerTier;

    const PARTNERS: &str = r#"[{
        "Type": "News", "Description": "Independent news", "IconURL": "https://cdn/news.png",
        "Partners": [
            {"Name": "Daily", "Description": "d", "LogicalIDs": ["id-DE#1", "id-DE#2"]},
            {"Name": "Weekly", "WebsiteURL": "https://weekly", "LogicalIDs": ["id-DE#2"]}
        ]
    }]"#;

    fn repository() -> PartnershipsRepository {
        PartnershipsRepository::new(serde_json::from_str(PARTNERS).expect("valid json"))
    }

    #[test]
    fn finds_partners_for_server() {
        let repo = repository();
        let names: Vec<&str> = repo
            .server_partnerships(&server("DE#2", "DE", ServerTier::Free, 1.0))
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Daily", "Weekly"]);
        assert!(repo
            .server_partnerships(&server("DE#3", "DE", ServerTier::Free, 1.0))
            .is_empty());
    }

    #[test]
    fn country_partnership_presence() {
        let repo = repository();
        let germany = VpnCountry::new(
            "DE",
            vec![
                server("DE#1", "DE", ServerTier::Free, 1.0),
                server("DE#5", "DE", ServerTier::Plus, 1.0),
            ],
            false,
        );
        let france = VpnCountry::new("FR", vec![server("FR#1", "FR", ServerTier::Free, 1.0)], false);
        assert!(repo.has_any_partnership(&germany));
        assert!(!repo.has_any_partnership(&france));
        assert!(!PartnershipsRepository::default().has_any_partnership(&germany));
    }
}
