use crate::domain::{
    Condition, ConditionValue, FieldDefinition, FieldId, FieldType, FormValues, OptionSet,
};
use crate::engine::{merge_values, on_field_change};

fn mk_field(id: &str, label: &str, field_type: FieldType, order: usize) -> FieldDefinition {
    FieldDefinition::new(FieldId::from(id), label, field_type, order)
}

fn condition(target: &str, value: &str) -> Condition {
    Condition {
        field: FieldId::from(target),
        value: ConditionValue::from(value.to_string()),
    }
}

/// category(select) gates room(select, options depend on category) which
/// gates socket(text). The cascade schema from the ticket form.
fn cascade_schema() -> Vec<FieldDefinition> {
    let mut category = mk_field("f:1", "Category", FieldType::Select, 0);
    category.options = Some(vec!["hardware".into(), "software".into()]);

    let mut room = mk_field("f:2", "Room", FieldType::Select, 1);
    room.conditional = Some(condition("f:1", "hardware"));
    room.option_sets = Some(vec![OptionSet {
        options: vec!["lab a".into(), "lab b".into()],
        condition: Some(condition("f:1", "hardware")),
    }]);

    let mut socket = mk_field("f:3", "Socket", FieldType::Text, 2);
    socket.conditional = Some(condition("f:2", "lab a"));

    vec![category, room, socket]
}

#[test]
fn an_edit_lands_in_the_returned_value_set() {
    let fields = cascade_schema();
    let values = FormValues::for_fields(&fields);
    let values = on_field_change("category", "hardware", values, &fields);
    assert_eq!(values.get("category"), "hardware");
}

#[test]
fn changing_an_upstream_select_cascades_through_dependent_fields() {
    let fields = cascade_schema();
    let values: FormValues = [
        ("category", "hardware"),
        ("room", "lab a"),
        ("socket", "wall socket 3 is dead"),
    ]
    .into_iter()
    .collect();

    let values = on_field_change("category", "software", values, &fields);
    assert_eq!(values.get("category"), "software");
    // room is hidden now, and socket's controller lost its value.
    assert_eq!(values.get("room"), "");
    assert_eq!(values.get("socket"), "");
}

#[test]
fn a_selection_that_fell_out_of_the_option_set_is_cleared() {
    let mut campus = mk_field("f:1", "Campus", FieldType::Select, 0);
    campus.options = Some(vec!["north".into(), "south".into()]);
    let mut building = mk_field("f:2", "Building", FieldType::Select, 1);
    building.option_sets = Some(vec![
        OptionSet {
            options: vec!["n1".into(), "n2".into()],
            condition: Some(condition("f:1", "north")),
        },
        OptionSet {
            options: vec!["s1".into()],
            condition: Some(condition("f:1", "south")),
        },
    ]);
    let fields = vec![campus, building];

    let values: FormValues = [("campus", "north"), ("building", "n2")]
        .into_iter()
        .collect();
    let values = on_field_change("campus", "south", values, &fields);
    assert_eq!(values.get("building"), "");

    // A selection still present in the new set survives.
    let values: FormValues = [("campus", "north"), ("building", "n1")]
        .into_iter()
        .collect();
    let values = on_field_change("building", "n2", values, &fields);
    assert_eq!(values.get("building"), "n2");
}

#[test]
fn valid_values_are_left_alone() {
    let fields = cascade_schema();
    let values: FormValues = [("category", "hardware"), ("room", "lab a")]
        .into_iter()
        .collect();
    let values = on_field_change("socket", "flickering", values, &fields);
    assert_eq!(values.get("category"), "hardware");
    assert_eq!(values.get("room"), "lab a");
    assert_eq!(values.get("socket"), "flickering");
}

#[test]
fn cleaning_reaches_a_fixpoint_on_cyclic_schemas() {
    // Both fields hide each other; the engine must settle, not loop.
    let mut first = mk_field("f:1", "First", FieldType::Select, 0);
    first.options = Some(vec!["x".into()]);
    first.conditional = Some(condition("f:2", "any"));
    let mut second = mk_field("f:2", "Second", FieldType::Select, 1);
    second.options = Some(vec!["y".into()]);
    second.conditional = Some(condition("f:1", "any"));
    let fields = vec![first, second];

    let values: FormValues = [("first", "x"), ("second", "y")].into_iter().collect();
    let values = on_field_change("first", "x", values, &fields);
    assert_eq!(values.get("first"), "");
    assert_eq!(values.get("second"), "");
}

#[test]
fn merge_keeps_values_for_surviving_names_and_drops_the_rest() {
    let fields = cascade_schema();
    let old: FormValues = [
        ("category", "hardware"),
        ("room", "lab a"),
        ("removed_field", "stale"),
    ]
    .into_iter()
    .collect();

    let merged = merge_values(&old, &fields);
    assert_eq!(merged.get("category"), "hardware");
    assert_eq!(merged.get("room"), "lab a");
    assert_eq!(merged.get("removed_field"), "");
    assert_eq!(merged.get("socket"), "");
    assert_eq!(merged.len(), fields.len());
}

#[test]
fn merge_cleans_selections_the_new_schema_no_longer_allows() {
    let mut category = mk_field("f:1", "Category", FieldType::Select, 0);
    category.options = Some(vec!["software".into()]);
    let fields = vec![category];

    let old: FormValues = [("category", "hardware")].into_iter().collect();
    let merged = merge_values(&old, &fields);
    assert_eq!(merged.get("category"), "");
}
