//! Structured listing filters and the applied-filter echo.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Comparison operator of a filter triple.
///
/// Listing endpoints currently only apply equality filters; the operator is
/// still carried per triple so the echo and any future range filters share
/// one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
}

/// One applied filter: field, value, operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub operator: FilterOperator,
}

/// The filters actually applied to a listing, built from the recognized
/// filter parameters only. Query parameters without a recognized field are
/// silently absent — from both the query and the echo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Build the set from the request query, keeping only `recognized` fields.
    pub fn from_query(query: &BTreeMap<String, String>, recognized: &[&str]) -> Self {
        let filters = recognized
            .iter()
            .filter_map(|field| {
                query.get(*field).map(|value| Filter {
                    field: (*field).to_owned(),
                    value: value.clone(),
                    operator: FilterOperator::Equals,
                })
            })
            .collect();
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True when `row` satisfies every filter. `field_value` maps a field
    /// name to the row's value for it.
    pub fn matches(&self, field_value: impl Fn(&str) -> Option<String>) -> bool {
        self.filters.iter().all(|f| match f.operator {
            FilterOperator::Equals => field_value(&f.field).as_deref() == Some(f.value.as_str()),
        })
    }

    /// The flattened `field -> value` echo returned in listing payloads,
    /// derived from the applied triples rather than the raw query string.
    pub fn applied(&self) -> Map<String, Value> {
        self.filters
            .iter()
            .map(|f| (f.field.clone(), Value::String(f.value.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn builds_only_recognized_fields() {
        let q = query(&[("category", "traffic"), ("page", "2"), ("evil", "x")]);
        let set = FilterSet::from_query(&q, &["category", "rubric"]);
        let applied = set.applied();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied["category"], "traffic");
    }

    #[test]
    fn empty_when_no_filter_params() {
        let q = query(&[("page", "1")]);
        let set = FilterSet::from_query(&q, &["category", "rubric"]);
        assert!(set.is_empty());
        assert!(set.applied().is_empty());
    }

    #[test]
    fn matches_all_filters() {
        let q = query(&[("category", "traffic"), ("rubric", "idea")]);
        let set = FilterSet::from_query(&q, &["category", "rubric"]);

        let row = |field: &str| match field {
            "category" => Some("traffic".to_owned()),
            "rubric" => Some("idea".to_owned()),
            _ => None,
        };
        assert!(set.matches(row));

        let other = |field: &str| match field {
            "category" => Some("housing".to_owned()),
            "rubric" => Some("idea".to_owned()),
            _ => None,
        };
        assert!(!set.matches(other));
    }

    #[test]
    fn empty_set_matches_everything() {
        let set = FilterSet::default();
        assert!(set.matches(|_| None));
    }
}
