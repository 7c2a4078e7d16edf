//! Resolution limits and the optional allow-list.

/// Configuration for [`resolve`](crate::resolve::resolve).
///
/// The limits bound worst-case work on adversarial input. Defaults are
/// 1000 fields total, 5 levels of nesting, and 128 characters per path
/// segment.
#[derive(Debug, Clone)]
pub struct FieldOptions {
    pub(crate) max_fields: usize,
    pub(crate) max_field_depth: usize,
    pub(crate) max_field_component_length: usize,
    pub(crate) limited_to: Vec<String>,
}

impl Default for FieldOptions {
    fn default() -> FieldOptions {
        FieldOptions {
            max_fields: 1000,
            max_field_depth: 5,
            max_field_component_length: 128,
            limited_to: Vec::new(),
        }
    }
}

impl FieldOptions {
    pub fn new() -> FieldOptions {
        FieldOptions::default()
    }

    /// Cap the total number of distinct fields across one resolution,
    /// counting every tree node once at first registration.
    pub fn with_max_fields(mut self, max: usize) -> FieldOptions {
        self.max_fields = max;
        self
    }

    /// Cap the nesting depth. Depth 1 is a bare identifier, so `a.b`
    /// needs a cap of at least 2.
    pub fn with_max_field_depth(mut self, depth: usize) -> FieldOptions {
        self.max_field_depth = depth;
        self
    }

    /// Cap the length of a single path segment, counted in characters.
    pub fn with_max_field_component_length(mut self, len: usize) -> FieldOptions {
        self.max_field_component_length = len;
        self
    }

    /// Restrict resolution to the fields reachable through the given
    /// selectors. Empty means unrestricted.
    pub fn with_limited_to_fields<I, S>(mut self, selectors: I) -> FieldOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limited_to = selectors.into_iter().map(Into::into).collect();
        self
    }
}
