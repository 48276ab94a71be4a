//! `addcontribution` — create a contribution from an exact-match body.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use common::DispatchError;
use serde_json::{json, Value};

use super::contribution_list::LIST_TAG;
use super::{maintenance_payload, require_exact_keys, require_string, ResponseKey};
use crate::cache::ResponseCache;
use crate::dispatch::RequestContext;
use crate::store::ContentStore;
use crate::token::Clock;

const REQUIRED_KEYS: &[&str] = &["title", "text", "category", "rubric"];

pub struct AddContribution {
    store: ContentStore,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
}

impl AddContribution {
    pub fn new(store: ContentStore, cache: ResponseCache, clock: Arc<dyn Clock>) -> Self {
        Self { store, cache, clock }
    }
}

#[async_trait]
impl ResponseKey for AddContribution {
    fn methods(&self) -> &'static [Method] {
        &[Method::POST]
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }

        let body = ctx.json_body()?;
        require_exact_keys(&body, REQUIRED_KEYS)?;
        let title = require_string(&body, "title")?;
        let text = require_string(&body, "text")?;
        let category = require_string(&body, "category")?;
        let rubric = require_string(&body, "rubric")?;

        let id = self
            .store
            .insert_contribution(title, text, category, rubric, self.clock.unix_now())
            .await;

        // New contributions must show up in cached listings.
        self.cache.invalidate_tag(LIST_TAG).await;

        Ok(json!({ "id": id }))
    }
}
