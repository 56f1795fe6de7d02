//! Explicit schema mapping built once before the join.
//!
//! Field pairing is resolved here, up front, into plain data: one
//! `(base, input_column, output_column)` triple per base field present on
//! both sides. The rest of the pipeline never inspects column names again.

use std::collections::HashSet;

use crate::config::KeyConfig;
use crate::error::ReconError;
use crate::model::{ColumnLayout, JoinColumn, Record, Side};

/// One base field and the literal column carrying it on each side.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    pub base: String,
    pub input_column: String,
    pub output_column: String,
}

#[derive(Debug, Clone)]
pub struct SchemaMap {
    /// Paired fields in first-encounter order over the input schema.
    /// The key field is always one of them.
    pub pairs: Vec<FieldMapping>,
    /// Fields present on one side only; pass-through, never compared.
    pub join_only: Vec<JoinColumn>,
    /// Index of the key field within `pairs`.
    pub key_index: usize,
}

impl SchemaMap {
    /// Build the mapping from the two record sets' schemas.
    ///
    /// Non-key fields pair by identical name; the key columns pair even when
    /// their literal names differ. Fails when either side lacks its key column.
    pub fn build(
        input: &[Record],
        output: &[Record],
        key: &KeyConfig,
    ) -> Result<Self, ReconError> {
        let input_fields = collect_schema(input);
        let output_fields = collect_schema(output);

        if !input_fields.iter().any(|f| f == &key.input) {
            return Err(ReconError::SchemaMismatch {
                side: Side::Input,
                key: key.input.clone(),
            });
        }
        if !output_fields.iter().any(|f| f == &key.output) {
            return Err(ReconError::SchemaMismatch {
                side: Side::Output,
                key: key.output.clone(),
            });
        }

        let mut pairs = Vec::new();
        let mut join_only = Vec::new();
        let mut used_output: HashSet<&str> = HashSet::new();
        used_output.insert(key.output.as_str());

        for field in &input_fields {
            if field == &key.input {
                pairs.push(FieldMapping {
                    base: key.input.clone(),
                    input_column: key.input.clone(),
                    output_column: key.output.clone(),
                });
            } else if field != &key.output && output_fields.contains(field) {
                used_output.insert(field.as_str());
                pairs.push(FieldMapping {
                    base: field.clone(),
                    input_column: field.clone(),
                    output_column: field.clone(),
                });
            } else {
                join_only.push(JoinColumn {
                    name: field.clone(),
                    side: Side::Input,
                });
            }
        }

        for field in &output_fields {
            if !used_output.contains(field.as_str()) {
                join_only.push(JoinColumn {
                    name: field.clone(),
                    side: Side::Output,
                });
            }
        }

        let key_index = pairs
            .iter()
            .position(|p| p.input_column == key.input)
            .unwrap_or(0);

        Ok(Self { pairs, join_only, key_index })
    }

    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            join_only: self.join_only.clone(),
            bases: self.pairs.iter().map(|p| p.base.clone()).collect(),
            key_base: self.pairs[self.key_index].base.clone(),
        }
    }
}

/// Union of field names across all records, in first-encounter order.
fn collect_schema(records: &[Record]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        for field in record.fields() {
            if seen.insert(field.as_str()) {
                // seen borrows from the record; clone into the schema list
                fields.push(field.clone());
            }
        }
    }
    fields
}
