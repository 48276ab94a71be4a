//! Domain data the gateway fronts: contributions, comments, votes, and
//! per-domain settings.
//!
//! The gateway itself owns no persistence semantics — handlers treat
//! [`memory::ContentStore`] as an opaque provider. The in-memory
//! implementation keeps the test-bed self-contained.

pub mod memory;

pub use memory::ContentStore;

use serde::{Deserialize, Serialize};

/// A published contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub category: String,
    pub rubric: String,
    /// Unix seconds at creation.
    pub created: u64,
}

/// A comment attached to a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Id of the contribution this comment belongs to.
    pub node: u64,
    pub subject: String,
    pub comment: String,
    pub created: u64,
}

/// Aggregate vote counts for one contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl VoteTally {
    /// Net rating used for sorting.
    pub fn rating(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

/// Per-domain platform settings served by the `init` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSettings {
    pub project_title: String,
    /// Current participation phase identifier.
    pub phase: String,
    /// Whether the rating endpoints accept votes.
    pub rating_open: bool,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            project_title: "Participation".into(),
            phase: "phase1".into(),
            rating_open: true,
        }
    }
}

/// A listing row: the contribution plus its derived counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRow {
    pub contribution: Contribution,
    pub comment_count: usize,
    pub tally: VoteTally,
}
