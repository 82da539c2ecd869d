//! Server ranking: turns a country's servers into ordered display groups.

pub mod groups;
pub mod ranker;

pub use groups::{GroupKind, GroupTitle, InfoType, ServersGroup};
pub use ranker::{servers_for_country, sort_for_display, RankingContext};
