use crate::domain::{FieldDefinition, FormValues, field_by_id};

/// Whether `field` is currently visible.
///
/// A field with no conditional is always visible. Otherwise its condition
/// must match the controlling field's current value AND the controlling field
/// must itself be visible, transitively: a field hidden because its own
/// controller is unmet cannot satisfy a downstream condition.
///
/// Everything unresolvable fails closed: a dangling `conditional.field`
/// reference hides the field, and a conditional cycle exhausts the recursion
/// budget (one hop per field in the schema) and also hides it.
pub fn is_visible(
    field: &FieldDefinition,
    values: &FormValues,
    all_fields: &[FieldDefinition],
) -> bool {
    visible_within(field, values, all_fields, all_fields.len())
}

fn visible_within(
    field: &FieldDefinition,
    values: &FormValues,
    all_fields: &[FieldDefinition],
    budget: usize,
) -> bool {
    let Some(conditional) = &field.conditional else {
        return true;
    };
    // A cycle would consume a hop per field before looping; out of budget
    // means we are in one.
    if budget == 0 {
        return false;
    }
    let Some(controller) = field_by_id(all_fields, &conditional.field) else {
        return false;
    };
    conditional.value.matches(values.get(&controller.name))
        && visible_within(controller, values, all_fields, budget - 1)
}
