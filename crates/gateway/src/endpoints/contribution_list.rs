//! `contributionlist` — cacheable paged listing of contributions.

use async_trait::async_trait;
use axum::http::Method;
use common::DispatchError;
use serde_json::{json, Value};

use super::{maintenance_payload, ResponseKey};
use crate::dispatch::RequestContext;
use crate::listing::pagination::PageLinks;
use crate::listing::{FilterSet, PageSize, PageWindow, SortDirection, SortPolicy};
use crate::store::{ContentStore, ContributionRow};

/// Fields callers may sort the listing by; anything else falls back to
/// creation time.
const SORT_POLICY: SortPolicy = SortPolicy::new(&["created", "title", "rating", "comments"], "created");

/// Query parameters recognized as listing filters.
const FILTER_FIELDS: &[&str] = &["category", "rubric"];

/// Tag purged whenever a contribution is added.
pub const LIST_TAG: &str = "node_list";

pub struct ContributionList {
    store: ContentStore,
    default_items_per_page: u64,
}

impl ContributionList {
    pub fn new(store: ContentStore, default_items_per_page: u64) -> Self {
        Self {
            store,
            default_items_per_page,
        }
    }
}

#[async_trait]
impl ResponseKey for ContributionList {
    fn methods(&self) -> &'static [Method] {
        &[Method::GET]
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    fn cache_tags(&self, _ctx: &RequestContext) -> Vec<String> {
        vec![LIST_TAG.to_owned()]
    }

    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError> {
        if ctx.maintenance_active {
            return Ok(maintenance_payload());
        }

        let filters = FilterSet::from_query(&ctx.query, FILTER_FIELDS);
        let mut rows: Vec<ContributionRow> = self
            .store
            .contribution_rows()
            .await
            .into_iter()
            .filter(|row| {
                filters.matches(|field| match field {
                    "category" => Some(row.contribution.category.clone()),
                    "rubric" => Some(row.contribution.rubric.clone()),
                    _ => None,
                })
            })
            .collect();

        let sort_field = SORT_POLICY.resolve(ctx.query.get("sort").map(String::as_str));
        let direction = SortDirection::parse(ctx.query.get("direction").map(String::as_str));
        sort_rows(&mut rows, sort_field, direction);

        let total = rows.len();
        let size = PageSize::parse(
            ctx.query.get("itemsPerPage").map(String::as_str),
            self.default_items_per_page,
        );
        let requested_page = ctx.query.get("page").and_then(|p| p.parse().ok());
        let window = PageWindow::compute(total, size, requested_page);
        let links = PageLinks::build("contributionlist", &ctx.query, &window);

        let nodes: Vec<Value> = window.slice(&rows).iter().map(row_json).collect();

        Ok(json!({
            "nodes": nodes,
            "totalNodes": total,
            "pagination": {
                "currentPage": window.current_page,
                "totalPages": window.total_pages,
                "itemsPerPage": match size {
                    PageSize::Finite(n) => json!(n),
                    PageSize::Infinite => json!("inf"),
                },
            },
            "links": links,
            "lastPage": window.is_last_page(),
            "filtersApplied": filters.applied(),
            "sort": { "field": sort_field, "direction": direction.as_str() },
        }))
    }
}

fn sort_rows(rows: &mut [ContributionRow], field: &str, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match field {
            "title" => a.contribution.title.cmp(&b.contribution.title),
            "rating" => a.tally.rating().cmp(&b.tally.rating()),
            "comments" => a.comment_count.cmp(&b.comment_count),
            _ => a.contribution.created.cmp(&b.contribution.created),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn row_json(row: &ContributionRow) -> Value {
    json!({
        "id": row.contribution.id,
        "title": row.contribution.title,
        "category": row.contribution.category,
        "rubric": row.contribution.rubric,
        "created": row.contribution.created,
        "comments": row.comment_count,
        "rating": row.tally.rating(),
    })
}
