//! Streaming services available per country and tier.

use crate::models::{ServerTier, StreamingService, StreamingServicesResponse};

pub trait StreamingLookup {
    /// Whether the country offers streaming services on any tier.
    fn has_streaming_services(&self, country_code: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct StreamingServicesModel {
    response: StreamingServicesResponse,
}

impl StreamingServicesModel {
    pub fn new(response: StreamingServicesResponse) -> Self {
        Self { response }
    }

    /// Services of every tier for a country, first occurrence of each name.
    pub fn for_all_tiers(&self, country_code: &str) -> Vec<&StreamingService> {
        let mut services: Vec<&StreamingService> = Vec::new();
        if let Some(tiers) = self.response.country_to_services.get(country_code) {
            for service in tiers.values().flatten() {
                if !services.iter().any(|s| s.name == service.name) {
                    services.push(service);
                }
            }
        }
        services
    }

    /// Services unlocked at `tier`, including those of lower tiers.
    pub fn for_tier(&self, country_code: &str, tier: ServerTier) -> Vec<&StreamingService> {
        let mut services: Vec<&StreamingService> = Vec::new();
        if let Some(tiers) = self.response.country_to_services.get(country_code) {
            let unlocked = tiers.iter().filter(|(key, _)| {
                key.parse::<i32>()
                    .map(|t| t <= tier.as_api())
                    .unwrap_or(false)
            });
            for (_, list) in unlocked {
                for service in list {
                    if !services.iter().any(|s| s.name == service.name) {
                        services.push(service);
                    }
                }
            }
        }
        services
    }

    pub fn icon_url(&self, service: &StreamingService) -> String {
        format!("{}{}", self.response.resource_base_url, service.icon)
    }
}

impl StreamingLookup for StreamingServicesModel {
    fn has_streaming_services(&self, country_code: &str) -> bool {
        !self.for_all_tiers(country_code).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAMING: &str = r#"{
        "ResourceBaseURL": "https://cdn.example.com/icons/",
        "StreamingServices": {
            "US": {
                "1": [{"Name": "Netflix", "Icon": "netflix.png"}],
                "2": [{"Name": "Netflix", "Icon": "netflix.png"}, {"Name": "Hulu", "Icon": "hulu.png"}]
            },
            "CH": {}
        }
    }"#;

    fn model() -> StreamingServicesModel {
        StreamingServicesModel::new(serde_json::from_str(STREAMING).expect("valid json"))
    }

    #[test]
    fn all_tiers_deduplicates_by_name() {
        let model = model();
        let names: Vec<&str> = model.for_all_tiers("US").iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Netflix", "Hulu"]);
        assert!(model.has_streaming_services("US"));
        assert!(!model.has_streaming_services("CH"));
        assert!(!model.has_streaming_services("SE"));
    }

    #[test]
    fn tier_filter_includes_lower_tiers() {
        let model = model();
        assert!(model.for_tier("US", ServerTier::Free).is_empty());
        assert_eq!(model.for_tier("US", ServerTier::Basic).len(), 1);
        assert_eq!(model.for_tier("US", ServerTier::Plus).len(), 2);
    }

    #[test]
    fn icon_url_joins_base() {
        let model = model();
        let services = model.for_all_tiers("US");
        assert_eq!(
            model.icon_url(services[0]),
            "https://cdn.example.com/icons/netflix.png"
        );
    }
}
