use std::sync::{Arc, Mutex};

use crate::domain::{FieldDefinition, FieldId, FieldType};
use crate::store::{MemorySink, MemoryStore, SchemaBatch, SchemaStore, SubmissionMeta, SubmissionSink, TicketStatus};

fn mk_field(id: &str, label: &str, order: usize) -> FieldDefinition {
    FieldDefinition::new(FieldId::from(id), label, FieldType::Text, order)
}

fn meta() -> SubmissionMeta {
    SubmissionMeta {
        user_id: "student-42".into(),
        status: TicketStatus::Pending,
        created_at: "2026-08-30T10:00:00Z".into(),
    }
}

#[test]
fn load_returns_fields_sorted_by_order() {
    let store = MemoryStore::with_fields(vec![
        mk_field("f:2", "Room", 1),
        mk_field("f:1", "Summary", 0),
    ]);
    let names: Vec<_> = store
        .load_schema()
        .unwrap()
        .into_iter()
        .map(|field| field.name)
        .collect();
    assert_eq!(names, vec!["summary", "room"]);
}

#[test]
fn inserts_get_fresh_ids_in_batch_order() {
    let mut store = MemoryStore::new();
    let batch = SchemaBatch {
        inserts: vec![mk_field("local:1", "Summary", 0), mk_field("local:2", "Room", 1)],
        ..Default::default()
    };
    let assigned = store.apply_batch(batch).unwrap();
    assert_eq!(assigned.len(), 2);
    assert!(assigned.iter().all(|id| !id.is_placeholder()));
    assert_ne!(assigned[0], assigned[1]);

    let stored = store.load_schema().unwrap();
    assert_eq!(stored[0].id, assigned[0]);
    assert_eq!(stored[1].id, assigned[1]);
}

#[test]
fn a_batch_touching_unknown_fields_changes_nothing() {
    let mut store = MemoryStore::with_fields(vec![mk_field("f:1", "Summary", 0)]);
    let batch = SchemaBatch {
        inserts: vec![mk_field("local:1", "Room", 1)],
        deletes: vec![FieldId::from("f:gone")],
        ..Default::default()
    };
    assert!(store.apply_batch(batch).is_err());
    let stored = store.load_schema().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "summary");
}

#[test]
fn listeners_see_the_snapshot_after_every_successful_batch() {
    let mut store = MemoryStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(Box::new(move |fields| {
        sink.lock()
            .unwrap()
            .push(fields.iter().map(|field| field.name.clone()).collect::<Vec<_>>());
    }));

    store
        .apply_batch(SchemaBatch {
            inserts: vec![mk_field("local:1", "Summary", 0)],
            ..Default::default()
        })
        .unwrap();
    store.fail_next_batch();
    let _ = store.apply_batch(SchemaBatch::default());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vec!["summary".to_string()]);
}

#[test]
fn the_sink_keeps_records_and_metadata() {
    let mut sink = MemorySink::new();
    let record = [("summary".to_string(), "broken mouse".to_string())]
        .into_iter()
        .collect();
    let ticket = sink.submit(record, meta()).unwrap();
    assert_eq!(sink.tickets().len(), 1);
    assert_eq!(sink.tickets()[0].id, ticket);
    assert_eq!(sink.tickets()[0].record["summary"], "broken mouse");
    assert_eq!(sink.tickets()[0].meta.status, TicketStatus::Pending);
}
