//! `rate` — shielded +1/-1 voting on a contribution.

use std::collections::HashSet;

use async_trait::async_trait;
use axum::http::Method;
use common::error::REJECTED_MESSAGE;
use common::protocol::Cookie;
use common::DispatchError;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{maintenance_payload, require_exact_keys, ResponseKey};
use crate::cache::ResponseCache;
use crate::dispatch::RequestContext;
use crate::store::ContentStore;

/// Cookie recording which contribution ids this device already rated,
/// as a comma-separated list.
pub const VOTED_COOKIE: &str = "agora_voted";

/// Anonymous per-device voter id, issued with the first vote.
pub const VOTER_COOKIE: &str = "agora_voter";

/// One year, the lifetime of both vote-bookkeeping cookies.
const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

pub struct Rate {
    store: ContentStore,
    cache: ResponseCache,
}

impl Rate {
    pub fn new(store: ContentStore, cache: ResponseCache) -> Self {
        Self { store, cache }
    }
}

#[async_trait]
impl ResponseKey for Rate {
    fn methods(&self) -> &'static [Method] {
        &[Method::POST]
    }

    fn requires_shielded_token(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }

        let id = ctx.path_id.ok_or(DispatchError::NotFound)?;
        let body = ctx.json_body()?;
        require_exact_keys(&body, &["rating"])?;
        let upvote = match body.get("rating").and_then(Value::as_i64) {
            Some(1) => true,
            Some(-1) => false,
            _ => return Err(DispatchError::MalformedRequest(REJECTED_MESSAGE.into())),
        };

        if self.store.contribution(id).await.is_none() {
            return Err(DispatchError::NotFound);
        }
        if !self.store.rating_open(&ctx.domain).await {
            return Err(DispatchError::Status {
                code: 403,
                message: "The rating phase is currently closed.".into(),
            });
        }
        if voted_ids(ctx).contains(&id) {
            return Err(DispatchError::Status {
                code: 403,
                message: "This contribution has already been rated from this device.".into(),
            });
        }

        let tally = self
            .store
            .record_vote(id, upvote)
            .await
            .ok_or(DispatchError::NotFound)?;

        // Cached views of this node now show stale tallies.
        self.cache.invalidate_tag(&format!("node:{id}")).await;

        Ok(json!({
            "id": id,
            "upvotes": tally.upvotes,
            "downvotes": tally.downvotes,
            "rating": tally.rating(),
        }))
    }

    fn cookies(&self, ctx: &RequestContext) -> Vec<Cookie> {
        let Some(id) = ctx.path_id else {
            return Vec::new();
        };

        let mut voted = voted_ids(ctx);
        voted.insert(id);
        let mut ids: Vec<u64> = voted.into_iter().collect();
        ids.sort_unstable();
        let list = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut cookies =
            vec![Cookie::new(VOTED_COOKIE, list).with_max_age(COOKIE_MAX_AGE_SECS)];
        if !ctx.cookies.contains_key(VOTER_COOKIE) {
            cookies.push(
                Cookie::new(VOTER_COOKIE, Uuid::new_v4().to_string())
                    .with_max_age(COOKIE_MAX_AGE_SECS),
            );
        }
        cookies
    }
}

/// Parse the already-voted cookie into a set of contribution ids.
fn voted_ids(ctx: &RequestContext) -> HashSet<u64> {
    ctx.cookies
        .get(VOTED_COOKIE)
        .map(|raw| raw.split(',').filter_map(|part| part.trim().parse().ok()).collect())
        .unwrap_or_default()
}
