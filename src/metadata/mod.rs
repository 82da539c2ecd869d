//! Partnership and streaming metadata lookups used to annotate server groups.

pub mod partnerships;
pub mod streaming;

pub use partnerships::{PartnershipLookup, PartnershipsRepository};
pub use streaming::{StreamingLookup, StreamingServicesModel};
