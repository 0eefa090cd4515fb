//! Renders operation sequences back into query strings.

use crate::operation::OperationSequence;
use crate::syntax::QuerySyntax;

/// Renders `operations` in canonical, lower-cased form.
///
/// An empty sequence renders as the empty string; anything else is wrapped
/// in separators, one segment per operation.
///
/// ```
/// use slashq::{compile, serialize, QuerySyntax};
///
/// let operations = compile("SORT-DESC-Name,Age/page-2").unwrap();
/// assert_eq!(
///     serialize(&operations, &QuerySyntax::default()),
///     "/sort-desc-name,age/page-2/"
/// );
/// ```
pub fn serialize(operations: &OperationSequence, syntax: &QuerySyntax) -> String {
    if operations.is_empty() {
        return String::new();
    }

    let separator = syntax.separator.to_string();
    let segments: Vec<String> = operations
        .iter()
        .map(|operation| operation.render(syntax))
        .collect();

    format!(
        "{separator}{}{separator}",
        segments.join(&separator)
    )
    .to_lowercase()
}
