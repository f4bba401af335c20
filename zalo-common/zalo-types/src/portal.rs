use serde::{Deserialize, Serialize};
use std::fmt;

pub type ThreadId = String;
pub type UserId = String;
pub type MessageId = String;

/// Kind of a remote conversation, as numbered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ThreadKind {
    #[default]
    Direct,
    Group,
}

impl ThreadKind {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Direct => 0,
            Self::Group => 1,
        }
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

impl From<i64> for ThreadKind {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::Group,
            _ => Self::Direct,
        }
    }
}

impl From<ThreadKind> for i64 {
    fn from(kind: ThreadKind) -> Self {
        kind.as_i64()
    }
}

/// Opaque portal identifier, `"<thread-id>:<thread-kind>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortalKey(String);

impl PortalKey {
    pub fn new(thread_id: &str, kind: ThreadKind) -> Self {
        Self(format!("{}:{}", thread_id, kind.as_i64()))
    }

    /// Wraps an already-encoded key without validating it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the key back into thread id and kind.
    ///
    /// Never fails: a key without a separator, or whose kind is not `0`/`1`,
    /// yields the id part with [`ThreadKind::Direct`].
    pub fn parse(&self) -> (ThreadId, ThreadKind) {
        decode(&self.0)
    }

    pub fn thread_id(&self) -> ThreadId {
        self.parse().0
    }

    pub fn kind(&self) -> ThreadKind {
        self.parse().1
    }
}

impl fmt::Display for PortalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PortalKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

pub fn encode(thread_id: &str, kind: ThreadKind) -> String {
    PortalKey::new(thread_id, kind).0
}

pub fn decode(key: &str) -> (ThreadId, ThreadKind) {
    // Split on the last separator so thread ids containing ':' survive.
    let Some((id, kind)) = key.rsplit_once(':') else {
        return (key.to_string(), ThreadKind::Direct);
    };
    let kind = match kind {
        "1" => ThreadKind::Group,
        _ => ThreadKind::Direct,
    };
    (id.to_string(), kind)
}
