//! Display groups produced by the ranker.

use serde::Serialize;

use crate::models::Server;

/// Title key of a server group. UIs map these to localized strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Internal,
    Fastest,
    Free,
    Basic,
    Plus,
}

/// Extra information a UI can offer next to a group title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfoType {
    Partners { country: String, secure_core: bool },
    Streaming { country: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTitle {
    pub kind: GroupKind,
    pub info: Option<InfoType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServersGroup<'a> {
    /// `None` for the flat secure core list.
    pub title: Option<GroupTitle>,
    pub servers: Vec<&'a Server>,
}

impl<'a> ServersGroup<'a> {
    pub fn titled(kind: GroupKind, servers: Vec<&'a Server>, info: Option<InfoType>) -> Self {
        Self {
            title: Some(GroupTitle { kind, info }),
            servers,
        }
    }

    pub fn untitled(servers: Vec<&'a Server>) -> Self {
        Self {
            title: None,
            servers,
        }
    }

    pub fn kind(&self) -> Option<GroupKind> {
        self.title.as_ref().map(|t| t.kind)
    }
}
