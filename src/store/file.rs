use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{FieldDefinition, FieldId};
use crate::error::PersistenceError;

use super::{
    SchemaBatch, SchemaStore,
    document::{DocumentFormat, fields_to_string, parse_fields_str},
};

/// Schema store backed by a single document file.
///
/// Each batch rewrites the whole document, which is this store's version of
/// atomicity: the file is only replaced after the entire batch has been
/// staged in memory. The format is inferred from the extension unless given
/// explicitly.
pub struct FileStore {
    path: PathBuf,
    format: DocumentFormat,
    next_id: u64,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self::with_format(path, format))
    }

    pub fn with_format(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        Self {
            path: path.into(),
            format,
            next_id: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_fields(&self) -> Result<Vec<FieldDefinition>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|err| PersistenceError::new(format!("read {}: {err}", self.path.display())))?;
        parse_fields_str(&contents, self.format)
            .map_err(|err| PersistenceError::new(format!("{}: {err:#}", self.path.display())))
    }

    fn write_fields(&self, fields: &[FieldDefinition]) -> Result<(), PersistenceError> {
        let contents = fields_to_string(fields, self.format)
            .map_err(|err| PersistenceError::new(format!("{err:#}")))?;
        fs::write(&self.path, contents)
            .map_err(|err| PersistenceError::new(format!("write {}: {err}", self.path.display())))
    }

    fn assign_id(&mut self, existing: &[FieldDefinition]) -> FieldId {
        // Skip ids already present in the document so re-opened stores do
        // not collide with earlier assignments.
        loop {
            self.next_id += 1;
            let candidate = FieldId::new(format!("field:{:04}", self.next_id));
            if !existing.iter().any(|field| field.id == candidate) {
                return candidate;
            }
        }
    }
}

impl SchemaStore for FileStore {
    fn load_schema(&self) -> Result<Vec<FieldDefinition>, PersistenceError> {
        self.read_fields()
    }

    fn apply_batch(&mut self, batch: SchemaBatch) -> Result<Vec<FieldId>, PersistenceError> {
        let mut fields = self.read_fields()?;

        for id in &batch.deletes {
            let before = fields.len();
            fields.retain(|field| &field.id != id);
            if fields.len() == before {
                return Err(PersistenceError::new(format!("cannot delete unknown field {id}")));
            }
        }
        for update in &batch.updates {
            let slot = fields
                .iter_mut()
                .find(|field| field.id == update.id)
                .ok_or_else(|| {
                    PersistenceError::new(format!("cannot update unknown field {}", update.id))
                })?;
            *slot = update.clone();
        }
        for (id, order) in &batch.reorders {
            let slot = fields
                .iter_mut()
                .find(|field| &field.id == id)
                .ok_or_else(|| {
                    PersistenceError::new(format!("cannot reorder unknown field {id}"))
                })?;
            slot.order = *order;
        }

        let mut assigned = Vec::with_capacity(batch.inserts.len());
        for insert in batch.inserts {
            let id = self.assign_id(&fields);
            let mut field = insert;
            field.id = id.clone();
            fields.push(field);
            assigned.push(id);
        }

        fields.sort_by_key(|field| field.order);
        self.write_fields(&fields)?;
        Ok(assigned)
    }
}
