//! Sort-field allow-lists and direction normalisation.

/// Sort direction, defaulting to descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse the `direction` parameter, case-insensitively.
    ///
    /// Anything that is not `asc` or `desc` falls back to the default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Per-endpoint allow-list of sortable fields.
#[derive(Debug, Clone, Copy)]
pub struct SortPolicy {
    allowed: &'static [&'static str],
    default_field: &'static str,
}

impl SortPolicy {
    /// `default_field` must itself be part of `allowed`.
    pub const fn new(allowed: &'static [&'static str], default_field: &'static str) -> Self {
        Self {
            allowed,
            default_field,
        }
    }

    /// Resolve the `sort` parameter against the allow-list; unrecognized
    /// field names fall back to the default.
    pub fn resolve(&self, requested: Option<&str>) -> &'static str {
        match requested {
            Some(field) => self
                .allowed
                .iter()
                .find(|allowed| **allowed == field)
                .copied()
                .unwrap_or(self.default_field),
            None => self.default_field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: SortPolicy = SortPolicy::new(&["created", "title", "rating"], "created");

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("Desc")), SortDirection::Desc);
    }

    #[test]
    fn garbage_direction_defaults_to_desc() {
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn allowed_field_is_resolved() {
        assert_eq!(POLICY.resolve(Some("title")), "title");
    }

    #[test]
    fn unknown_field_falls_back_to_default() {
        assert_eq!(POLICY.resolve(Some("password")), "created");
        assert_eq!(POLICY.resolve(None), "created");
    }

    #[test]
    fn direction_as_str() {
        assert_eq!(SortDirection::Asc.as_str(), "ASC");
        assert_eq!(SortDirection::Desc.as_str(), "DESC");
    }
}
