//! Streaming services response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingService {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Icon", default)]
    pub icon: String,
}

/// Streaming services keyed by country code, then by server tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingServicesResponse {
    #[serde(rename = "ResourceBaseURL", default)]
    pub resource_base_url: String,
    #[serde(rename = "StreamingServices", default)]
    pub country_to_services: BTreeMap<String, BTreeMap<String, Vec<StreamingService>>>,
}
