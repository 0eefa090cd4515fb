//! Tests for `#[derive(Queryable)]`.

#![cfg(feature = "derive")]

use slashq::{FieldKind, FieldResolver, QueryEnum, Queryable, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Priority {
    Low,
    Medium,
    High,
}

impl QueryEnum for Priority {
    const VARIANTS: &'static [&'static str] = &["low", "medium", "high"];

    fn ordinal(&self) -> u32 {
        *self as u32
    }
}

#[derive(Debug, Clone, Queryable)]
struct Ticket {
    #[query(Number)]
    id: u32,

    #[query(String)]
    title: String,

    #[query(Number, rename = "hours")]
    estimate: Option<f32>,

    #[query(Char)]
    grade: char,

    #[query(Bool)]
    closed: bool,

    #[query(Enum)]
    priority: Priority,

    #[query(String)]
    assignee: Option<String>,

    #[query(skip)]
    #[allow(dead_code)]
    secret: String,

    #[allow(dead_code)]
    notes: Vec<String>,
}

fn ticket(
    id: u32,
    title: &str,
    estimate: Option<f32>,
    priority: Priority,
    assignee: Option<&str>,
) -> Ticket {
    Ticket {
        id,
        title: title.to_string(),
        estimate,
        grade: if id < 3 { 'a' } else { 'b' },
        closed: id % 2 == 1,
        priority,
        assignee: assignee.map(str::to_string),
        secret: format!("s{id}"),
        notes: Vec::new(),
    }
}

fn tickets() -> Vec<Ticket> {
    vec![
        ticket(1, "Login fails", Some(2.5), Priority::High, Some("ana")),
        ticket(2, "Typo on page", None, Priority::Low, None),
        ticket(3, "Slow search", Some(8.0), Priority::Medium, Some("bo")),
        ticket(4, "Crash on save", Some(1.0), Priority::High, None),
    ]
}

fn run(query: &str) -> Vec<u32> {
    slashq::run::<Ticket, _>(query, tickets())
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect()
}

#[test]
fn generates_field_constants() {
    assert_eq!(Ticket::ID, "id");
    assert_eq!(Ticket::TITLE, "title");
    assert_eq!(Ticket::HOURS, "hours");
    assert_eq!(Ticket::PRIORITY, "priority");
}

#[test]
fn schema_contains_annotated_fields_only() {
    let schema = Ticket::schema();
    assert_eq!(schema.len(), 7);
    assert!(schema.resolve("secret").is_none());
    assert!(schema.resolve("notes").is_none());
    assert!(schema.resolve("estimate").is_none());
    assert!(schema.resolve("hours").is_some());
}

#[test]
fn schema_records_kinds_and_optionality() {
    let schema = Ticket::schema();

    let hours = schema.resolve("hours").unwrap();
    assert_eq!(hours.kind(), FieldKind::Number);
    assert!(hours.is_optional());

    let title = schema.resolve("title").unwrap();
    assert_eq!(title.kind(), FieldKind::String);
    assert!(!title.is_optional());

    let priority = schema.resolve("priority").unwrap();
    assert_eq!(priority.kind(), FieldKind::Enum(Priority::VARIANTS));
}

#[test]
fn accessors_read_record_values() {
    let schema = Ticket::schema();
    let rows = tickets();

    let title = schema.resolve("title").unwrap();
    assert_eq!(title.value(&rows[0]), Value::String("Login fails"));

    let hours = schema.resolve("hours").unwrap();
    assert_eq!(hours.value(&rows[1]), Value::None);

    let assignee = schema.resolve("assignee").unwrap();
    assert_eq!(assignee.value(&rows[2]), Value::String("bo"));

    let priority = schema.resolve("priority").unwrap();
    assert_eq!(priority.value(&rows[2]), Value::Enum(1));

    let grade = schema.resolve("grade").unwrap();
    assert_eq!(grade.value(&rows[3]), Value::Char('b'));

    let closed = schema.resolve("closed").unwrap();
    assert_eq!(closed.value(&rows[0]), Value::Bool(true));
}

#[test]
fn derived_schema_runs_queries() {
    assert_eq!(run("priority-equals-high"), [1, 4]);
    assert_eq!(run("hours-greaterthan-2"), [1, 3]);
    assert_eq!(run("hours-equals-null"), [2]);
    assert_eq!(run("assignee-not-null/sort-desc-id"), [3, 1]);
    assert_eq!(run("closed-equals-false"), [2, 4]);
    assert_eq!(run("grade-equals-b"), [3, 4]);
    assert_eq!(run("title-like-on"), [2, 4]);
    assert_eq!(run("sort-desc-priority,id"), [4, 1, 3, 2]);
}

#[test]
fn skipped_and_unannotated_fields_are_not_filterable() {
    assert_eq!(run("secret-equals-s1"), [1, 2, 3, 4]);
    assert_eq!(run("estimate-equals-null"), [1, 2, 3, 4]);
}
