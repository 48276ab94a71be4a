//! [`ContentStore`]: thread-safe in-memory store for the gateway's domain data.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Comment, Contribution, ContributionRow, DomainSettings, VoteTally};

#[derive(Debug, Default)]
struct StoreInner {
    contributions: HashMap<u64, Contribution>,
    comments: HashMap<u64, Comment>,
    votes: HashMap<u64, VoteTally>,
    settings: HashMap<String, DomainSettings>,
    next_id: u64,
}

/// Shared content store.
///
/// Wraps an `Arc<RwLock<_>>` so that concurrent request handlers read
/// without contention while writers (new contributions, comments, votes)
/// hold the write lock for single-map operations only.
#[derive(Clone, Debug, Default)]
pub struct ContentStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ContentStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Settings for `domain`, falling back to defaults for unknown domains.
    pub async fn settings(&self, domain: &str) -> DomainSettings {
        self.inner
            .read()
            .await
            .settings
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_settings(&self, domain: impl Into<String>, settings: DomainSettings) {
        self.inner
            .write()
            .await
            .settings
            .insert(domain.into(), settings);
    }

    /// Whether the rating phase is open for `domain`.
    pub async fn rating_open(&self, domain: &str) -> bool {
        self.settings(domain).await.rating_open
    }

    // -----------------------------------------------------------------------
    // Contributions
    // -----------------------------------------------------------------------

    pub async fn insert_contribution(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
        rubric: impl Into<String>,
        created: u64,
    ) -> u64 {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.contributions.insert(
            id,
            Contribution {
                id,
                title: title.into(),
                text: text.into(),
                category: category.into(),
                rubric: rubric.into(),
                created,
            },
        );
        id
    }

    pub async fn contribution(&self, id: u64) -> Option<Contribution> {
        self.inner.read().await.contributions.get(&id).cloned()
    }

    /// All contributions with their derived comment and vote counts.
    pub async fn contribution_rows(&self) -> Vec<ContributionRow> {
        let inner = self.inner.read().await;
        inner
            .contributions
            .values()
            .map(|c| ContributionRow {
                contribution: c.clone(),
                comment_count: inner.comments.values().filter(|m| m.node == c.id).count(),
                tally: inner.votes.get(&c.id).copied().unwrap_or_default(),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Attach a comment to contribution `node`.
    ///
    /// Returns `None` when the contribution does not exist.
    pub async fn insert_comment(
        &self,
        node: u64,
        subject: impl Into<String>,
        comment: impl Into<String>,
        created: u64,
    ) -> Option<u64> {
        let mut inner = self.inner.write().await;
        if !inner.contributions.contains_key(&node) {
            return None;
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.comments.insert(
            id,
            Comment {
                id,
                node,
                subject: subject.into(),
                comment: comment.into(),
                created,
            },
        );
        Some(id)
    }

    /// Comments for `node`, oldest first.
    pub async fn comments_for(&self, node: u64) -> Vec<Comment> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.node == node)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.id);
        comments
    }

    // -----------------------------------------------------------------------
    // Votes
    // -----------------------------------------------------------------------

    /// Record a +1/-1 vote on contribution `id`.
    ///
    /// Returns the updated tally, or `None` when the contribution is unknown.
    pub async fn record_vote(&self, id: u64, upvote: bool) -> Option<VoteTally> {
        let mut inner = self.inner.write().await;
        if !inner.contributions.contains_key(&id) {
            return None;
        }
        let tally = inner.votes.entry(id).or_default();
        if upvote {
            tally.upvotes += 1;
        } else {
            tally.downvotes += 1;
        }
        Some(*tally)
    }

    pub async fn tally(&self, id: u64) -> VoteTally {
        self.inner
            .read()
            .await
            .votes
            .get(&id)
            .copied()
            .unwrap_or_default()
    }
}
