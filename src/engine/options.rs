use indexmap::IndexSet;

use crate::domain::{FieldDefinition, FormValues, field_by_id};

/// Resolves the options currently selectable for `field`.
///
/// The default set (no condition) contributes first, then every conditional
/// set whose condition matches the current values, in declaration order. The
/// result is the deduplicated union; uniqueness is the contract, iteration
/// order is merely stable. Non-select fields resolve to the empty set.
///
/// Pure over its inputs: identical inputs always yield identical sets.
pub fn resolve_options(
    field: &FieldDefinition,
    values: &FormValues,
    all_fields: &[FieldDefinition],
) -> IndexSet<String> {
    let mut resolved = IndexSet::new();
    if !field.is_select() {
        return resolved;
    }

    match &field.option_sets {
        Some(sets) if !sets.is_empty() => {
            for set in sets.iter().filter(|set| set.is_default()) {
                resolved.extend(set.options.iter().cloned());
            }
            for set in sets {
                let Some(condition) = &set.condition else {
                    continue;
                };
                // A condition pointing at a field that no longer exists
                // contributes nothing. This happens transiently while the
                // admin edits the schema.
                let Some(controller) = field_by_id(all_fields, &condition.field) else {
                    continue;
                };
                if condition.value.matches(values.get(&controller.name)) {
                    resolved.extend(set.options.iter().cloned());
                }
            }
        }
        _ => {
            if let Some(options) = &field.options {
                resolved.extend(options.iter().cloned());
            }
        }
    }
    resolved
}
