//! Server catalog: the in-memory snapshot of countries and servers, and the
//! API/cache source it is loaded from.

pub mod manager;
pub mod source;

pub use manager::{best_score_server, ServerCatalog};
pub use source::{load_server_list, ServerListResponse, ServerListSource};
