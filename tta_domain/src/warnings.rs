//! Warning policy threaded through the tick/tock/search APIs.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum WarningKind {
    /// Two concurrent environment diffs wrote the same key with different
    /// values; ordering decided the winner.
    NonIdempotentUpdate,
    /// A query was not of a searchable shape and was dropped from the run.
    UnsupportedQuery,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::NonIdempotentUpdate => "non-idempotent-update",
            WarningKind::UnsupportedQuery => "unsupported-query",
        }
    }
}

impl std::str::FromStr for WarningKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non-idempotent-update" => Ok(WarningKind::NonIdempotentUpdate),
            "unsupported-query" => Ok(WarningKind::UnsupportedQuery),
            other => Err(format!("unknown warning kind '{}'", other)),
        }
    }
}

/// Which warnings are emitted. All kinds are enabled by default; callers
/// silence individual kinds (the host's `--ignore` flag).
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    ignored: FxHashSet<WarningKind>,
}

impl Warnings {
    pub fn new() -> Self {
        Warnings::default()
    }

    pub fn ignore(&mut self, kind: WarningKind) {
        self.ignored.insert(kind);
    }

    pub fn ignoring(mut self, kind: WarningKind) -> Self {
        self.ignore(kind);
        self
    }

    pub fn enabled(&self, kind: WarningKind) -> bool {
        !self.ignored.contains(&kind)
    }

    pub fn emit(&self, kind: WarningKind, msg: &str) {
        if self.enabled(kind) {
            crate::log_warn!("[{}] {}", kind.as_str(), msg);
        }
    }
}
