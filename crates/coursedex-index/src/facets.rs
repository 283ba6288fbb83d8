//! Field facets: bucket counts over search hits and facet-based narrowing.

use crate::document::Document;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// A categorical field that search results can be bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetField {
    ContentType,
    Organizations,
    PacingType,
    Language,
    LevelType,
    SeatTypes,
    ProgramType,
}

impl FacetField {
    /// Facets reported by the course run search.
    pub const COURSE_RUN: &'static [FacetField] = &[
        FacetField::PacingType,
        FacetField::Language,
        FacetField::LevelType,
        FacetField::Organizations,
        FacetField::SeatTypes,
    ];

    /// Facets reported by the aggregate search.
    pub const AGGREGATE: &'static [FacetField] = &[
        FacetField::ContentType,
        FacetField::Organizations,
        FacetField::PacingType,
        FacetField::Language,
        FacetField::LevelType,
        FacetField::SeatTypes,
        FacetField::ProgramType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FacetField::ContentType => "content_type",
            FacetField::Organizations => "organizations",
            FacetField::PacingType => "pacing_type",
            FacetField::Language => "language",
            FacetField::LevelType => "level_type",
            FacetField::SeatTypes => "seat_types",
            FacetField::ProgramType => "type",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::AGGREGATE.iter().copied().find(|f| f.name() == name)
    }

    /// Bucket values of this field for a document. Empty when the field does
    /// not apply to the document's content type.
    pub fn values(self, doc: &Document) -> Vec<String> {
        match (self, doc) {
            (FacetField::ContentType, _) => vec![doc.content_type().as_str().to_string()],
            (FacetField::Organizations, _) => {
                doc.organizations().iter().map(|o| o.key.clone()).collect()
            }
            (FacetField::PacingType, Document::CourseRun(run)) => {
                vec![run.pacing_type.as_str().to_string()]
            }
            (FacetField::Language, Document::CourseRun(run)) => {
                run.language.iter().cloned().collect()
            }
            (FacetField::LevelType, Document::CourseRun(run)) => {
                run.level_type.iter().cloned().collect()
            }
            (FacetField::LevelType, Document::Course(course)) => {
                course.level_type.iter().cloned().collect()
            }
            (FacetField::SeatTypes, Document::CourseRun(run)) => run.seat_types.clone(),
            (FacetField::ProgramType, Document::Program(program)) => {
                vec![program.program_type.clone()]
            }
            _ => Vec::new(),
        }
    }
}

/// A `{field}_exact:{value}` narrowing selected by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFacet {
    pub field: FacetField,
    pub value: String,
}

impl SelectedFacet {
    pub fn new(field: FacetField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Parse `pacing_type_exact:self_paced`. Returns `None` for unknown fields
    /// or malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let (name, value) = raw.split_once(':')?;
        let field = FacetField::parse(name.strip_suffix("_exact")?)?;
        if value.is_empty() {
            return None;
        }
        Some(Self::new(field, value))
    }

    /// Query-string form, the inverse of [`Self::parse`].
    pub fn to_param(&self) -> String {
        format!("{}_exact:{}", self.field.name(), self.value)
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.field.values(doc).iter().any(|v| *v == self.value)
    }
}

/// Count bucket values per field. Buckets are ordered by count descending,
/// then by text; fields with no values are omitted.
pub fn count_field_facets<'a>(
    docs: impl IntoIterator<Item = &'a Document>,
    fields: &[FacetField],
) -> BTreeMap<FacetField, Vec<(String, usize)>> {
    let mut counts: HashMap<FacetField, HashMap<String, usize>> = HashMap::new();

    for doc in docs {
        for &field in fields {
            let mut values = field.values(doc);
            values.sort();
            values.dedup();
            for value in values {
                *counts.entry(field).or_default().entry(value).or_default() += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|(field, buckets)| {
            let mut buckets: Vec<(String, usize)> = buckets.into_iter().collect();
            buckets.sort_by(|(a_text, a_count), (b_text, b_count)| {
                b_count.cmp(a_count).then_with(|| a_text.cmp(b_text))
            });
            (field, buckets)
        })
        .collect()
}
