//! Access policy: what a user's plan lets them see and connect to.

pub mod access;
pub mod user;

pub use access::{connect_decision, partition_countries, tier_group_order, ConnectDecision};
pub use user::{UserTier, VpnUser};
