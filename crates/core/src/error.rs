//! Error values returned by the selector engine.
//!
//! Two message namespaces mirror where an error originates: syntax errors
//! from the scanner and parser carry a `fields:` prefix, semantic errors
//! (lookup, duplication, limits) carry a `fieldmask:` prefix.

use thiserror::Error;

/// Every recoverable error produced while resolving selector strings.
///
/// Values compare with `==`, so callers can dispatch on the exact error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The scanner or parser rejected the selector text itself.
    #[error("fields: {0}")]
    Syntax(String),

    /// A field is missing from the allow-list or the schema. Carries the
    /// fully qualified dotted path.
    #[error("fieldmask: field not found or not allowed '{0}'")]
    FieldNotFound(String),

    /// The same field was requested twice, or a leaf was re-requested as a
    /// parent (or the other way around). Carries the fully qualified
    /// dotted path.
    #[error("fieldmask: duplicated field '{0}'")]
    DuplicatedField(String),

    /// The total number of distinct fields exceeded the configured cap.
    #[error("fieldmask: exceeded max number of fields")]
    ExceededMaxFields,

    /// Nesting went deeper than the configured depth cap.
    #[error("fieldmask: exceeded max number of field depth")]
    ExceededMaxDepth,

    /// A single path segment was longer than the configured cap.
    #[error("fieldmask: exceeded length of field components")]
    ExceededMaxComponentLength,
}

impl FieldError {
    /// Prepend a parent name to the dotted path of a path-carrying error.
    ///
    /// Limit and syntax errors pass through unchanged, so callers can
    /// apply this unconditionally while unwinding.
    pub fn with_parent(self, parent: &str) -> FieldError {
        match self {
            FieldError::FieldNotFound(path) => {
                FieldError::FieldNotFound(format!("{}.{}", parent, path))
            }
            FieldError::DuplicatedField(path) => {
                FieldError::DuplicatedField(format!("{}.{}", parent, path))
            }
            other => other,
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>) -> FieldError {
        FieldError::Syntax(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FieldError::syntax("not allow spaces").to_string(),
            "fields: not allow spaces",
        );
        assert_eq!(
            FieldError::FieldNotFound("seller.name".to_owned()).to_string(),
            "fieldmask: field not found or not allowed 'seller.name'",
        );
        assert_eq!(
            FieldError::DuplicatedField("sku".to_owned()).to_string(),
            "fieldmask: duplicated field 'sku'",
        );
        assert_eq!(
            FieldError::ExceededMaxFields.to_string(),
            "fieldmask: exceeded max number of fields",
        );
        assert_eq!(
            FieldError::ExceededMaxDepth.to_string(),
            "fieldmask: exceeded max number of field depth",
        );
        assert_eq!(
            FieldError::ExceededMaxComponentLength.to_string(),
            "fieldmask: exceeded length of field components",
        );
    }

    #[test]
    fn with_parent_prepends_path_errors() {
        let err = FieldError::DuplicatedField("name".to_owned()).with_parent("provider");
        assert_eq!(err, FieldError::DuplicatedField("provider.name".to_owned()));

        let err = FieldError::FieldNotFound("id".to_owned())
            .with_parent("logo")
            .with_parent("provider");
        assert_eq!(
            err,
            FieldError::FieldNotFound("provider.logo.id".to_owned()),
        );
    }

    #[test]
    fn with_parent_leaves_other_errors_alone() {
        assert_eq!(
            FieldError::ExceededMaxDepth.with_parent("provider"),
            FieldError::ExceededMaxDepth,
        );
        assert_eq!(
            FieldError::syntax("missing '}' at the end").with_parent("provider"),
            FieldError::syntax("missing '}' at the end"),
        );
    }
}
