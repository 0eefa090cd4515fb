//! Property-based tests for slashq using proptest.

use proptest::prelude::*;
use slashq::parser::{item, literal, repeat, Parser};
use slashq::{
    compile, serialize, Comparator, Executor, FieldKind, FilterSpec, Limit, Number,
    OperationSequence, PageSpec, QueryBuilder, QueryOperation, QuerySyntax, Schema, SortSpec,
    Value,
};

// ============================================================================
// Test helpers
// ============================================================================

fn number_schema() -> Schema<i64> {
    Schema::<i64>::new().field("value", FieldKind::Number, |n| {
        Value::Number(Number::I64(*n))
    })
}

fn apply(operations: &OperationSequence, items: Vec<i64>) -> Vec<i64> {
    let schema = number_schema();
    Executor::new(&schema).apply(operations, items)
}

fn comparator_strategy() -> impl Strategy<Value = Comparator> {
    prop::sample::select(Comparator::ALL.to_vec())
}

// Operations whose canonical form compiles back to the same operation. Field
// names start with `f` so no filter collides with a segment prefix, and
// values start with a digit so none reads as `null`. Both mix cases.
fn operation_strategy() -> impl Strategy<Value = QueryOperation> {
    prop_oneof![
        (0usize..1000).prop_map(QueryOperation::Skip),
        (0usize..1000).prop_map(|n| QueryOperation::Take(Limit::Count(n))),
        Just(QueryOperation::Take(Limit::Unbounded)),
        (1i64..50, 1i64..50).prop_map(|(number, size)| {
            QueryOperation::Page(PageSpec::new(number, size).unwrap())
        }),
        (prop::collection::vec("[a-z]{1,8}", 1..4), any::<bool>()).prop_map(
            |(columns, descending)| {
                QueryOperation::Sort(SortSpec::new(columns, descending).unwrap())
            }
        ),
        ("[fF][a-zA-Z]{0,7}", comparator_strategy(), "[0-9][a-zA-Z0-9.]{0,7}").prop_map(
            |(field, comparator, value)| {
                QueryOperation::Filter(FilterSpec::new(field, comparator, value))
            }
        ),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Skip keeps the tail of the collection.
    #[test]
    fn skip_keeps_tail(
        items in prop::collection::vec(any::<i64>(), 0..100),
        n in 0usize..150,
    ) {
        let result = apply(&QueryBuilder::new().skip(n).build(), items.clone());
        prop_assert_eq!(result.len(), items.len().saturating_sub(n));
        prop_assert_eq!(&result[..], &items[n.min(items.len())..]);
    }

    /// Take keeps the head of the collection.
    #[test]
    fn take_keeps_head(
        items in prop::collection::vec(any::<i64>(), 0..100),
        n in 0usize..150,
    ) {
        let result = apply(&QueryBuilder::new().take(n).build(), items.clone());
        prop_assert_eq!(result.len(), items.len().min(n));
        prop_assert_eq!(&result[..], &items[..n.min(items.len())]);
    }

    /// Take-all leaves the collection unchanged.
    #[test]
    fn take_all_is_identity(items in prop::collection::vec(any::<i64>(), 0..100)) {
        let result = apply(&QueryBuilder::new().take_all().build(), items.clone());
        prop_assert_eq!(result, items);
    }

    /// A page is a skip followed by a take.
    #[test]
    fn page_equals_skip_then_take(
        items in prop::collection::vec(any::<i64>(), 0..100),
        number in 1i64..20,
        size in 1i64..20,
    ) {
        let page = PageSpec::new(number, size).unwrap();
        prop_assert_eq!(page.skip() as i64, (number - 1) * size);
        prop_assert_eq!(page.take() as i64, size);
        prop_assert_eq!(page.page_number() as i64, number);

        let paged = apply(&QueryBuilder::new().page(number, size).unwrap().build(), items.clone());
        let manual = apply(
            &QueryBuilder::new().skip(page.skip()).take(page.take()).build(),
            items,
        );
        prop_assert_eq!(paged, manual);
    }

    /// Filters never grow the collection and keep input order.
    #[test]
    fn filter_is_an_ordered_subset(
        items in prop::collection::vec(-1000i64..1000, 0..100),
        comparator in comparator_strategy(),
        threshold in -1000i64..1000,
    ) {
        let operations = QueryBuilder::new().filter("value", comparator, threshold.to_string()).build();
        let result = apply(&operations, items.clone());
        prop_assert!(result.len() <= items.len());

        let mut remaining = items.iter();
        for kept in &result {
            prop_assert!(remaining.any(|item| item == kept));
        }
    }

    /// Sorting orders the collection without losing records.
    #[test]
    fn sort_orders_values(
        items in prop::collection::vec(any::<i64>(), 0..100),
        descending in any::<bool>(),
    ) {
        let operations = if descending {
            QueryBuilder::new().sort_desc(["value"]).unwrap().build()
        } else {
            QueryBuilder::new().sort_asc(["value"]).unwrap().build()
        };
        let result = apply(&operations, items.clone());

        let mut expected = items;
        expected.sort();
        if descending {
            expected.reverse();
        }
        prop_assert_eq!(result, expected);
    }

    /// The top-level parser never fails, whatever the input.
    #[test]
    fn compile_never_panics(query in ".{0,60}") {
        let _ = compile(&query);
    }

    /// Repeat always succeeds and never consumes past a failure.
    #[test]
    fn repeat_never_fails(input in "[ab]{0,30}") {
        let parsed = repeat(literal("a", ())).parse(&input).unwrap();
        prop_assert_eq!(parsed.value.len(), input.len() - input.trim_start_matches('a').len());
        prop_assert_eq!(parsed.remaining, input.trim_start_matches('a'));
    }

    /// Repeat over `item` consumes the whole input.
    #[test]
    fn repeat_item_consumes_everything(input in ".{0,30}") {
        let parsed = repeat(item()).parse(&input).unwrap();
        prop_assert_eq!(parsed.value.len(), input.chars().count());
        prop_assert_eq!(parsed.remaining, "");
    }

    /// A query and its serialized form select the same records.
    #[test]
    fn serialized_query_selects_the_same_records(
        items in prop::collection::vec(-50i64..50, 0..40),
        comparator in comparator_strategy(),
        value in "[0-9]{1,2}",
        descending in any::<bool>(),
    ) {
        let query = format!(
            "/VALUE-{}-{value}/sort-{}value/",
            comparator.token().to_uppercase(),
            if descending { "DESC-" } else { "" },
        );
        let compiled = compile(&query).unwrap();
        let reread = compile(&serialize(&compiled, &QuerySyntax::default())).unwrap();
        prop_assert_eq!(apply(&compiled, items.clone()), apply(&reread, items));
    }

    /// Serialized sequences compile back to the same operations.
    #[test]
    fn serialization_round_trips(
        operations in prop::collection::vec(operation_strategy(), 0..8),
    ) {
        let sequence: OperationSequence = operations.into_iter().collect();
        let rendered = serialize(&sequence, &QuerySyntax::default());
        let compiled = compile(&rendered).unwrap();
        prop_assert_eq!(compiled, sequence);
    }
}
