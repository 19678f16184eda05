#![deny(rust_2018_idioms)]

mod domain;
mod editor;
mod engine;
mod error;
mod session;
mod store;


pub use domain::{
    Condition, ConditionValue, FieldDefinition, FieldId, FieldType, FormValues, OptionSet,
    derive_name, field_by_id, field_by_name,
};
pub use editor::{SchemaEditor, audit_fields};
pub use engine::{
    is_visible, merge_values, on_field_change, resolve_options, validate_for_submission,
};
pub use error::{
    MissingField, PersistenceError, SaveError, SchemaError, SubmitError, ValidationError,
};
pub use session::SubmissionForm;
pub use store::{
    DocumentFormat, FileStore, MemorySink, MemoryStore, SchemaBatch, SchemaListener, SchemaStore,
    StoredTicket, SubmissionMeta, SubmissionSink, TicketId, TicketStatus, fields_to_string,
    parse_fields_str,
};

pub mod prelude {
    pub use super::{
        Condition, ConditionValue, FieldDefinition, FieldId, FieldType, FormValues, OptionSet,
        SchemaEditor, SchemaStore, SubmissionForm, SubmissionSink,
    };
}
