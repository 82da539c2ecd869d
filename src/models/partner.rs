//! Partnership models.

use serde::{Deserialize, Serialize};

/// A category of partners (news outlets, NGOs, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerType {
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "IconURL", default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub partners: Vec<Partner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Partner {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "IconURL", default)]
    pub icon_url: Option<String>,
    #[serde(rename = "WebsiteURL", default)]
    pub website_url: Option<String>,
    /// Logical server IDs run with this partner.
    #[serde(rename = "LogicalIDs", default)]
    pub logical_ids: Vec<String>,
}
