//! Serializable data models for VPN API responses.
//!
//! Field names follow the API's PascalCase wire format; Rust-side names are
//! snake_case.

pub mod country;
pub mod feature_flags;
pub mod partner;
pub mod server;
pub mod streaming;

#[cfg(test)]
pub(crate) mod fixtures;

pub use country::VpnCountry;
pub use feature_flags::FeatureFlags;
pub use partner::{Partner, PartnerType};
pub use server::{ConnectingDomain, Server, ServerFeatures, ServerTier};
pub use streaming::{StreamingService, StreamingServicesResponse};

/// The API encodes booleans as `0`/`1` integers.
pub(crate) mod int_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(i32::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(i32::deserialize(deserializer)? != 0)
    }
}

pub(crate) fn default_true() -> bool {
    true
}
