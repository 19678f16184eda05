use indexmap::{IndexMap, IndexSet};

use crate::domain::{FieldDefinition, FormValues, field_by_name};
use crate::engine::{
    is_visible, merge_values, on_field_change, resolve_options, validate_for_submission,
};
use crate::error::{PersistenceError, SubmitError, ValidationError};
use crate::store::{SchemaStore, SubmissionMeta, SubmissionSink, TicketId};

/// One in-progress ticket submission: a schema snapshot plus the value set it
/// owns. Every mutation goes through the consistency engine, so the values
/// are always clean with respect to the current schema.
#[derive(Debug, Clone)]
pub struct SubmissionForm {
    fields: Vec<FieldDefinition>,
    values: FormValues,
}

impl SubmissionForm {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        let values = FormValues::for_fields(&fields);
        Self { fields, values }
    }

    pub fn from_store(store: &dyn SchemaStore) -> Result<Self, PersistenceError> {
        Ok(Self::new(store.load_schema()?))
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Applies one user edit and the cleaning cascade it triggers.
    pub fn set_value(&mut self, name: &str, value: &str) {
        let current = std::mem::take(&mut self.values);
        self.values = on_field_change(name, value, current, &self.fields);
    }

    /// Swaps in a fresh schema snapshot. Values survive for fields whose
    /// `name` still exists; everything else starts unset, and one cleaning
    /// pass drops selections the new schema no longer allows.
    pub fn reload_schema(&mut self, fields: Vec<FieldDefinition>) {
        self.values = merge_values(&self.values, &fields);
        self.fields = fields;
    }

    pub fn visible_fields(&self) -> Vec<&FieldDefinition> {
        self.fields
            .iter()
            .filter(|field| is_visible(field, &self.values, &self.fields))
            .collect()
    }

    /// The options currently selectable for the named field; empty for
    /// unknown or non-select fields.
    pub fn options_for(&self, name: &str) -> IndexSet<String> {
        match field_by_name(&self.fields, name) {
            Some(field) => resolve_options(field, &self.values, &self.fields),
            None => IndexSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_for_submission(&self.values, &self.fields)
    }

    /// Flattens the value set to the currently visible fields, in schema
    /// order. This is the record shape the sink receives.
    pub fn build_record(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .filter(|field| is_visible(field, &self.values, &self.fields))
            .map(|field| (field.name.clone(), self.values.get(&field.name).to_string()))
            .collect()
    }

    /// Validates and submits. Failure of either step leaves the in-progress
    /// values untouched so the user can fix or retry; success clears the
    /// form for the next ticket.
    pub fn submit(
        &mut self,
        sink: &mut dyn SubmissionSink,
        meta: SubmissionMeta,
    ) -> Result<TicketId, SubmitError> {
        self.validate()?;
        let ticket = sink.submit(self.build_record(), meta)?;
        self.values = FormValues::for_fields(&self.fields);
        Ok(ticket)
    }
}
