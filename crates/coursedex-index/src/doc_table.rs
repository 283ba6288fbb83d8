//! Document table and identifier lookup.

use crate::document::{ContentType, Document};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Unique identifier for a document entry.
///
/// Uses u32 to keep posting lists compact; a catalog never approaches
/// 4.2 billion documents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

/// Document table: every indexed course run, course, and program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTable {
    entries: Vec<Document>,
    /// `(content type, identifier)` to document. Identifiers are run keys,
    /// course uuids, and program uuids, matching the `id` query field.
    by_id: HashMap<(ContentType, String), DocId>,
    /// Course key to course document.
    course_keys: HashMap<String, DocId>,
}

impl DocTable {
    /// Create a new empty document table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            course_keys: HashMap::new(),
        }
    }

    /// Insert a new document.
    ///
    /// # Panics
    /// Panics if the table exceeds u32::MAX entries.
    pub fn insert(&mut self, doc: Document) -> DocId {
        let id = self.entries.len();
        assert!(
            id <= u32::MAX as usize,
            "Document table exceeded u32::MAX capacity ({} documents)",
            u32::MAX
        );
        let doc_id = DocId(id as u32);

        self.by_id.insert((doc.content_type(), doc.id()), doc_id);
        if let Document::Course(course) = &doc {
            self.course_keys.insert(course.key.clone(), doc_id);
        }

        self.entries.push(doc);
        doc_id
    }

    /// Get a document by ID.
    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.entries.get(id.0 as usize)
    }

    /// Look up a document by content type and identifier.
    pub fn find(&self, content_type: ContentType, id: &str) -> Option<DocId> {
        self.by_id.get(&(content_type, id.to_string())).copied()
    }

    /// Look up a course document by course key.
    pub fn find_course_key(&self, key: &str) -> Option<DocId> {
        self.course_keys.get(key).copied()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, doc)| (DocId(i as u32), doc))
    }

    /// Number of documents of the given content type.
    pub fn count_of(&self, content_type: ContentType) -> usize {
        self.entries
            .iter()
            .filter(|doc| doc.content_type() == content_type)
            .count()
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DocTable {
    fn default() -> Self {
        Self::new()
    }
}
