use std::collections::BTreeMap;

use crate::domain::{Condition, FieldDefinition, field_by_id};

/// Lints a loaded schema and reports every problem found, as human-readable
/// findings. Unlike the save-time validation this does not stop at the first
/// issue; it is meant for inspecting schemas that are already persisted.
pub fn audit_fields(fields: &[FieldDefinition]) -> Vec<String> {
    let mut findings = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        if field.order != index {
            findings.push(format!(
                "field '{}' has order {} but sits at position {index}",
                field.label, field.order
            ));
        }
        if field.label.trim().is_empty() {
            findings.push(format!("field {} has an empty label", field.id));
        }
    }

    let mut by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for field in fields {
        by_name.entry(&field.name).or_default().push(&field.label);
    }
    for (name, labels) in by_name {
        if labels.len() > 1 {
            findings.push(format!(
                "fields {} share the derived name '{name}'",
                labels.join(" and ")
            ));
        }
    }

    for field in fields {
        if let Some(conditional) = &field.conditional {
            check_reference(field, conditional, "visibility condition", fields, &mut findings);
        }
        for set in field.option_sets.iter().flatten() {
            if let Some(condition) = &set.condition {
                check_reference(field, condition, "option set condition", fields, &mut findings);
            }
        }
        if on_conditional_cycle(field, fields) {
            findings.push(format!(
                "field '{}' sits on a conditional cycle and will never show",
                field.label
            ));
        }
    }

    findings
}

fn check_reference(
    field: &FieldDefinition,
    condition: &Condition,
    what: &str,
    fields: &[FieldDefinition],
    findings: &mut Vec<String>,
) {
    if condition.field == field.id {
        findings.push(format!("field '{}' {what} references itself", field.label));
        return;
    }
    match field_by_id(fields, &condition.field) {
        None => findings.push(format!(
            "field '{}' {what} references unknown field {}",
            field.label, condition.field
        )),
        Some(controller) if !controller.is_select() => findings.push(format!(
            "field '{}' {what} references '{}', which is not a select",
            field.label, controller.label
        )),
        Some(_) => {}
    }
}

/// Walks the visibility-controller chain upward; a chain longer than the
/// schema itself has bitten its own tail.
fn on_conditional_cycle(field: &FieldDefinition, fields: &[FieldDefinition]) -> bool {
    let mut current = field;
    for _ in 0..fields.len() {
        let Some(conditional) = &current.conditional else {
            return false;
        };
        let Some(controller) = field_by_id(fields, &conditional.field) else {
            return false;
        };
        current = controller;
        if current.id == field.id {
            return true;
        }
    }
    current.conditional.is_some()
}
