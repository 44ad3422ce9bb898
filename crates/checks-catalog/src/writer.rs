//! Catalog document writer
//!
//! Produces the canonical block-style document: a version marker followed by
//! the `checklists` collection. Field order is fixed per record type (id,
//! title, optional fields, collection last) and optional fields are omitted
//! when blank, absent or `false`, so `parse(serialize(c)) == c` for every
//! catalog the parser can produce.

use crate::error::WriteError;
use crate::model::{Catalog, Checklist, DOCUMENT_VERSION};
use serde::Serialize;

#[derive(Serialize)]
struct Document<'a> {
    version: &'static str,
    checklists: &'a [Checklist],
}

/// Serialize a catalog to document text
///
/// # Errors
/// `WriteError::Encoding` if the encoder itself fails; a well-formed
/// in-memory catalog never triggers this.
pub fn serialize_to_string(catalog: &Catalog) -> Result<String, WriteError> {
    let document = Document {
        version: DOCUMENT_VERSION,
        checklists: &catalog.checklists,
    };
    serde_yaml::to_string(&document).map_err(|e| {
        tracing::error!("YAML encode failed: {}", e);
        WriteError::Encoding(e.to_string())
    })
}

/// Serialize a catalog to document bytes
///
/// # Errors
/// See [`serialize_to_string`].
#[inline]
pub fn serialize(catalog: &Catalog) -> Result<Vec<u8>, WriteError> {
    serialize_to_string(catalog).map(String::into_bytes)
}
