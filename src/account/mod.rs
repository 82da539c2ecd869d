//! Account login state.

pub mod state;

pub use state::{Account, AccountState, AccountStateTracker, AccountStatus};
