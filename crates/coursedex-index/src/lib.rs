//! coursedex-index: Document table, trigram index, query language, and search engine.

pub mod doc_table;
pub mod document;
pub mod engine;
pub mod facets;
pub mod query_language;
pub mod serializers;
pub mod synonyms;
pub mod trigram;

pub use doc_table::{DocId, DocTable};
pub use document::{ContentType, CourseDoc, Document, OrgRef, ProgramDoc, ProgramRef, RunDoc};
pub use engine::{CourseFilter, CourseView, Hit, Ordering, SearchEngine, SearchRequest, TypeaheadHits};
pub use facets::{FacetField, SelectedFacet};
pub use query_language::Expr;
pub use synonyms::Synonyms;
pub use trigram::{Trigram, TrigramIndex};
