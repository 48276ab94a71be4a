//! `addcomment` — attach a comment to an existing contribution.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use common::error::REJECTED_MESSAGE;
use common::DispatchError;
use serde_json::{json, Value};

use super::{maintenance_payload, require_exact_keys, require_string, ResponseKey};
use crate::cache::ResponseCache;
use crate::dispatch::RequestContext;
use crate::store::ContentStore;
use crate::token::Clock;

const REQUIRED_KEYS: &[&str] = &["node", "subject", "comment"];

pub struct AddComment {
    store: ContentStore,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
}

impl AddComment {
    pub fn new(store: ContentStore, cache: ResponseCache, clock: Arc<dyn Clock>) -> Self {
        Self { store, cache, clock }
    }
}

#[async_trait]
impl ResponseKey for AddComment {
    fn methods(&self) -> &'static [Method] {
        &[Method::POST]
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }

        let body = ctx.json_body()?;
        require_exact_keys(&body, REQUIRED_KEYS)?;
        let node = body
            .get("node")
            .and_then(Value::as_u64)
            .ok_or_else(|| DispatchError::MalformedRequest(REJECTED_MESSAGE.into()))?;
        let subject = require_string(&body, "subject")?;
        let comment = require_string(&body, "comment")?;

        let id = self
            .store
            .insert_comment(node, subject, comment, self.clock.unix_now())
            .await
            .ok_or(DispatchError::NotFound)?;

        // Refresh anything displaying this node or its comment thread.
        self.cache
            .invalidate_tag(&format!("node:comments:{node}"))
            .await;
        self.cache.invalidate_tag(&format!("node:{node}")).await;

        Ok(json!({ "id": id, "node": node }))
    }
}
