//! `init` — cacheable snapshot of the per-domain platform settings.

use async_trait::async_trait;
use axum::http::Method;
use common::DispatchError;
use serde_json::{json, Value};

use super::{maintenance_payload, ResponseKey};
use crate::dispatch::RequestContext;
use crate::store::ContentStore;

/// The front end calls this once on startup to learn the active project
/// phase and whether rating is open.
pub struct Init {
    store: ContentStore,
}

impl Init {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResponseKey for Init {
    fn methods(&self) -> &'static [Method] {
        &[Method::GET]
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }
        let settings = self.store.settings(&ctx.domain).await;
        Ok(json!({
            "domain": ctx.domain,
            "projectTitle": settings.project_title,
            "phase": settings.phase,
            "ratingOpen": settings.rating_open,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DomainSettings;

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "default")
    }

    #[tokio::test]
    async fn returns_domain_settings() {
        let store = ContentStore::new();
        store
            .set_settings(
                "default",
                DomainSettings {
                    project_title: "Neighbourhood plan".into(),
                    phase: "phase2".into(),
                    rating_open: false,
                },
            )
            .await;

        let payload = Init::new(store).execute(&ctx()).await.unwrap();
        assert_eq!(payload["projectTitle"], "Neighbourhood plan");
        assert_eq!(payload["phase"], "phase2");
        assert_eq!(payload["ratingOpen"], false);
    }

    #[tokio::test]
    async fn maintenance_branch_short_circuits() {
        let store = ContentStore::new();
        let payload = Init::new(store)
            .execute(&ctx().with_maintenance(true))
            .await
            .unwrap();
        assert_eq!(payload["maintenanceMode"], true);
    }
}
