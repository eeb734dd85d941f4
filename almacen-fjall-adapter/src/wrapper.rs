use almacen::collection::Document;
use almacen::errors::{AlmacenError, ErrorKind};
use std::error::Error;
use thiserror::Error;

/// Error type for document encoding in the Fjall adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FjallValueError {
    /// Deserialization of binary data failed
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),
    /// Serialization of a document failed
    #[error("Serialization failed: {0}")]
    SerializationError(String),
}

impl From<FjallValueError> for AlmacenError {
    fn from(err: FjallValueError) -> Self {
        AlmacenError::new(&err.to_string(), ErrorKind::EncodingError)
    }
}

pub type FjallValueResult<T> = Result<T, FjallValueError>;

/// Byte-serialized [Document] as stored in a Fjall partition.
///
/// Documents are encoded with bincode's legacy configuration through serde.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FjallValue(Vec<u8>);

impl FjallValue {
    #[inline]
    pub fn try_from_document(document: &Document) -> FjallValueResult<FjallValue> {
        bincode::serde::encode_to_vec(document, bincode::config::legacy())
            .map(FjallValue)
            .map_err(|e| FjallValueError::SerializationError(e.to_string()))
    }

    #[inline]
    pub fn try_into_document(self) -> FjallValueResult<Document> {
        decode_document(&self.0)
    }
}

/// Decodes a document straight from partition bytes.
#[inline]
pub(crate) fn decode_document(bytes: &[u8]) -> FjallValueResult<Document> {
    bincode::serde::decode_from_slice(bytes, bincode::config::legacy())
        .map(|(document, _)| document)
        .map_err(|e| FjallValueError::DeserializationError(e.to_string()))
}

impl From<FjallValue> for Vec<u8> {
    #[inline]
    fn from(value: FjallValue) -> Self {
        value.0
    }
}

impl AsRef<[u8]> for FjallValue {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Key prefix shared by every document of `collection`: the name's byte
/// length as a big-endian `u32`, then the name itself.
///
/// The length makes prefixes unambiguous: no key of collection `"a"` starts
/// with the prefix of collection `"ab"`, and the reverse.
#[inline]
pub(crate) fn collection_prefix(collection: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(4 + collection.len());
    key.extend_from_slice(&(collection.len() as u32).to_be_bytes());
    key.extend_from_slice(collection.as_bytes());
    key
}

/// Partition key of document `id` in `collection`.
#[inline]
pub(crate) fn document_key(collection: &str, id: &str) -> Vec<u8> {
    let mut key = collection_prefix(collection);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Converts Fjall backend errors into opaque almacen errors.
pub(crate) fn to_almacen_error(error: impl Error) -> AlmacenError {
    AlmacenError::new(&format!("Fjall Error: {}", error), ErrorKind::BackendError)
}
