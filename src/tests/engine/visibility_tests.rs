use crate::domain::{
    Condition, ConditionValue, FieldDefinition, FieldId, FieldType, FormValues,
};
use crate::engine::is_visible;

fn mk_field(id: &str, label: &str, field_type: FieldType, order: usize) -> FieldDefinition {
    FieldDefinition::new(FieldId::from(id), label, field_type, order)
}

fn conditioned_on(mut field: FieldDefinition, target: &str, value: &str) -> FieldDefinition {
    field.conditional = Some(Condition {
        field: FieldId::from(target),
        value: ConditionValue::from(value.to_string()),
    });
    field
}

#[test]
fn fields_without_a_conditional_are_always_visible() {
    let field = mk_field("f:1", "Summary", FieldType::Text, 0);
    let all = vec![field.clone()];
    assert!(is_visible(&field, &FormValues::new(), &all));
}

#[test]
fn exact_match_controls_visibility() {
    let category = mk_field("f:1", "Category", FieldType::Select, 0);
    let detail = conditioned_on(
        mk_field("f:2", "Hardware Detail", FieldType::Text, 1),
        "f:1",
        "hardware",
    );
    let all = vec![category, detail.clone()];

    let values: FormValues = [("category", "hardware")].into_iter().collect();
    assert!(is_visible(&detail, &values, &all));
    let values: FormValues = [("category", "software")].into_iter().collect();
    assert!(!is_visible(&detail, &values, &all));
    assert!(!is_visible(&detail, &FormValues::new(), &all));
}

#[test]
fn any_means_visible_for_every_non_empty_value() {
    let category = mk_field("f:1", "Category", FieldType::Select, 0);
    let detail = conditioned_on(
        mk_field("f:2", "Detail", FieldType::Textarea, 1),
        "f:1",
        "any",
    );
    let all = vec![category, detail.clone()];

    assert!(!is_visible(&detail, &FormValues::new(), &all));
    for value in ["hardware", "software", "0"] {
        let values: FormValues = [("category", value)].into_iter().collect();
        assert!(is_visible(&detail, &values, &all), "value {value:?}");
    }
}

#[test]
fn a_dangling_reference_hides_the_field() {
    let detail = conditioned_on(
        mk_field("f:2", "Detail", FieldType::Text, 0),
        "f:gone",
        "any",
    );
    let all = vec![detail.clone()];
    let values: FormValues = [("whatever", "set")].into_iter().collect();
    assert!(!is_visible(&detail, &values, &all));
}

#[test]
fn a_field_is_hidden_when_its_controller_is_hidden() {
    // category -> room (visible only for hardware) -> socket (visible only
    // for room "lab a"). Even with room's value still present, socket must
    // not show once category stops being hardware.
    let category = mk_field("f:1", "Category", FieldType::Select, 0);
    let room = conditioned_on(
        mk_field("f:2", "Room", FieldType::Select, 1),
        "f:1",
        "hardware",
    );
    let socket = conditioned_on(
        mk_field("f:3", "Socket", FieldType::Text, 2),
        "f:2",
        "lab a",
    );
    let all = vec![category, room, socket.clone()];

    let values: FormValues = [("category", "hardware"), ("room", "lab a")]
        .into_iter()
        .collect();
    assert!(is_visible(&socket, &values, &all));

    let values: FormValues = [("category", "software"), ("room", "lab a")]
        .into_iter()
        .collect();
    assert!(!is_visible(&socket, &values, &all));
}

#[test]
fn conditional_cycles_resolve_to_hidden() {
    let first = conditioned_on(
        mk_field("f:1", "First", FieldType::Select, 0),
        "f:2",
        "any",
    );
    let second = conditioned_on(
        mk_field("f:2", "Second", FieldType::Select, 1),
        "f:1",
        "any",
    );
    let all = vec![first.clone(), second.clone()];
    let values: FormValues = [("first", "x"), ("second", "y")].into_iter().collect();

    assert!(!is_visible(&first, &values, &all));
    assert!(!is_visible(&second, &values, &all));
}

#[test]
fn self_referencing_fields_resolve_to_hidden() {
    let field = conditioned_on(
        mk_field("f:1", "Loop", FieldType::Select, 0),
        "f:1",
        "any",
    );
    let all = vec![field.clone()];
    let values: FormValues = [("loop", "x")].into_iter().collect();
    assert!(!is_visible(&field, &values, &all));
}
