//! `contributiondetails` — one contribution with its comments and tallies.

use async_trait::async_trait;
use axum::http::Method;
use common::DispatchError;
use serde_json::{json, Value};

use super::{maintenance_payload, ResponseKey};
use crate::dispatch::RequestContext;
use crate::store::ContentStore;

/// Top-level keys retained by [`ResponseKey::post_process`].
///
/// The whitelist keeps future store-internal fields from leaking into the
/// public payload.
const PUBLIC_FIELDS: &[&str] = &[
    "id",
    "title",
    "text",
    "category",
    "rubric",
    "created",
    "comments",
    "upvotes",
    "downvotes",
    "rating",
    "maintenanceMode",
    "message",
];

pub struct ContributionDetails {
    store: ContentStore,
}

impl ContributionDetails {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResponseKey for ContributionDetails {
    fn methods(&self) -> &'static [Method] {
        &[Method::GET]
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    fn cache_tags(&self, ctx: &RequestContext) -> Vec<String> {
        match ctx.path_id {
            Some(id) => vec![format!("node:{id}"), format!("node:comments:{id}")],
            None => Vec::new(),
        }
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }

        let id = ctx.path_id.ok_or(DispatchError::NotFound)?;
        let contribution = self
            .store
            .contribution(id)
            .await
            .ok_or(DispatchError::NotFound)?;
        let comments = self.store.comments_for(id).await;
        let tally = self.store.tally(id).await;

        let mut payload = serde_json::to_value(&contribution)
            .map_err(|e| DispatchError::unhandled(e.to_string()))?;
        if let Some(map) = payload.as_object_mut() {
            map.insert(
                "comments".into(),
                json!(comments
                    .iter()
                    .map(|c| json!({
                        "id": c.id,
                        "subject": c.subject,
                        "comment": c.comment,
                        "created": c.created,
                    }))
                    .collect::<Vec<_>>()),
            );
            map.insert("upvotes".into(), json!(tally.upvotes));
            map.insert("downvotes".into(), json!(tally.downvotes));
            map.insert("rating".into(), json!(tally.rating()));
        }
        Ok(payload)
    }

    fn post_process(&self, mut payload: Value) -> Value {
        if let Some(map) = payload.as_object_mut() {
            map.retain(|key, _| PUBLIC_FIELDS.contains(&key.as_str()));
        }
        payload
    }
}
