//! Log categories used as `log` targets.
//!
//! Targets are the lowercase category name with `_` replaced by `.`, so
//! `ConnConnect` logs under `conn.connect` and can be filtered with
//! `RUST_LOG=conn=debug`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    ConnConnect,
    Ui,
    User,
    UserPlan,
    Api,
    App,
    Settings,
}

impl LogCategory {
    pub const fn target(self) -> &'static str {
        match self {
            LogCategory::ConnConnect => "conn.connect",
            LogCategory::Ui => "ui",
            LogCategory::User => "user",
            LogCategory::UserPlan => "user.plan",
            LogCategory::Api => "api",
            LogCategory::App => "app",
            LogCategory::Settings => "settings",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}
