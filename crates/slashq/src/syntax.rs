//! Wire syntax configuration.
//!
//! [`QuerySyntax`] bundles every separator, prefix and token the compiler
//! and serializer use, plus the default page size. It is passed explicitly;
//! there is no process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Page size used when a `page-` segment omits one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Separators, prefixes and tokens of the query mini-language.
///
/// The defaults reproduce the standard wire format:
///
/// ```
/// use slashq::QuerySyntax;
///
/// let syntax = QuerySyntax::default();
/// assert_eq!(syntax.separator, '/');
/// assert_eq!(syntax.sort_prefix, "sort-");
/// assert_eq!(syntax.default_page_size, 10);
/// ```
///
/// Missing keys fall back to their defaults when deserializing, so a host
/// configuration only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySyntax {
    /// Separates segments: `/`.
    pub separator: char,
    /// Separates the parts of a segment: `-`.
    pub inner_separator: char,
    /// Separates sort columns: `,`.
    pub list_delimiter: char,
    pub page_prefix: String,
    pub skip_prefix: String,
    pub take_prefix: String,
    pub sort_prefix: String,
    /// Nested inside a sort segment to flip the direction.
    pub descending_prefix: String,
    /// `take-all`.
    pub take_all: String,
    /// Filter value meaning "no value".
    pub null_token: String,
    pub default_page_size: usize,
}

impl Default for QuerySyntax {
    fn default() -> Self {
        QuerySyntax {
            separator: '/',
            inner_separator: '-',
            list_delimiter: ',',
            page_prefix: "page-".to_string(),
            skip_prefix: "skip-".to_string(),
            take_prefix: "take-".to_string(),
            sort_prefix: "sort-".to_string(),
            descending_prefix: "desc-".to_string(),
            take_all: "all".to_string(),
            null_token: "null".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QuerySyntax {
    /// Checks that the configuration can be parsed unambiguously.
    ///
    /// The three delimiters must differ, no prefix may be empty or contain
    /// the segment separator, and the default page size must be positive.
    pub fn validate(&self) -> Result<()> {
        if self.separator == self.inner_separator
            || self.separator == self.list_delimiter
            || self.inner_separator == self.list_delimiter
        {
            return Err(QueryError::InvalidSyntax(
                "separators and list delimiter must be distinct".to_string(),
            ));
        }

        let prefixes = [
            ("page", &self.page_prefix),
            ("skip", &self.skip_prefix),
            ("take", &self.take_prefix),
            ("sort", &self.sort_prefix),
            ("descending", &self.descending_prefix),
        ];
        for (name, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(QueryError::InvalidSyntax(format!(
                    "{name} prefix cannot be empty"
                )));
            }
            if prefix.contains(self.separator) {
                return Err(QueryError::InvalidSyntax(format!(
                    "{name} prefix '{prefix}' contains the separator '{}'",
                    self.separator
                )));
            }
        }

        if self.default_page_size == 0 {
            return Err(QueryError::InvalidSyntax(
                "default page size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_syntax_is_valid() {
        assert!(QuerySyntax::default().validate().is_ok());
    }

    #[test]
    fn colliding_separators_are_rejected() {
        let syntax = QuerySyntax {
            inner_separator: '/',
            ..QuerySyntax::default()
        };
        assert!(matches!(
            syntax.validate(),
            Err(QueryError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn prefix_containing_separator_is_rejected() {
        let syntax = QuerySyntax {
            skip_prefix: "skip/".to_string(),
            ..QuerySyntax::default()
        };
        let err = syntax.validate().unwrap_err();
        assert!(err.to_string().contains("skip prefix"));
    }

    #[test]
    fn zero_default_page_size_is_rejected() {
        let syntax = QuerySyntax {
            default_page_size: 0,
            ..QuerySyntax::default()
        };
        assert!(syntax.validate().is_err());
    }
}
