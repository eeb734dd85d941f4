use std::collections::HashMap;

use crate::collection::Document;
use crate::errors::AlmacenResult;

/// A named group of documents keyed by their `_id`.
///
/// Every document held by a collection has a string `_id` equal to the key
/// it is stored under; [`Collection::insert`] is the only way in.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    documents: HashMap<String, Document>,
}

impl Collection {
    pub fn new() -> Self {
        Collection {
            documents: HashMap::new(),
        }
    }

    /// Stores `document` under its own `_id`, replacing any document already
    /// stored with that identifier. Returns the replaced document.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::errors::ErrorKind::IdNotString`] if `_id` is missing
    /// or not a string; the collection is left untouched.
    pub fn insert(&mut self, document: Document) -> AlmacenResult<Option<Document>> {
        let id = document.id()?.to_string();
        Ok(self.documents.insert(id, document))
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Document> {
        self.documents.remove(id)
    }

    /// Iterates over the stored documents in unspecified order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
