//! Search engine over the document table.

use crate::document::{tokenize, ContentType, CourseDoc, Document, ProgramDoc, ProgramRef, RunDoc};
use crate::facets::{count_field_facets, FacetField, SelectedFacet};
use crate::query_language::{Expr, MatchContext};
use crate::{DocId, DocTable, Synonyms, Trigram, TrigramIndex};
use chrono::{DateTime, Utc};
use coursedex_core::model::{CourseRunStatus, ProgramStatus};
use coursedex_core::Availability;
use hashbrown::{HashMap, HashSet};
use std::cmp;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Score of a typeahead word that equals a token.
const EXACT_TOKEN_SCORE: f32 = 1.0;
/// Score of a typeahead word that is a proper prefix of a token.
const PREFIX_TOKEN_SCORE: f32 = 0.75;

/// Explicit result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    /// Relevance when a query is given, then content type and key.
    #[default]
    Default,
    /// `start`: earliest start first.
    StartAsc,
    /// `-start`: latest start first.
    StartDesc,
}

impl Ordering {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" => Some(Ordering::Default),
            "start" => Some(Ordering::StartAsc),
            "-start" => Some(Ordering::StartDesc),
            _ => None,
        }
    }
}

/// A search over the document table.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: Expr,
    pub content_types: Vec<ContentType>,
    /// Partner short code; `None` searches every partner.
    pub partner: Option<String>,
    /// Empty matches every aggregation key.
    pub aggregation_keys: Vec<String>,
    pub selected_facets: Vec<SelectedFacet>,
    pub selected_query_facets: Vec<Availability>,
    pub ordering: Ordering,
    /// Apply the publish and visibility gate.
    pub require_published: bool,
}

impl SearchRequest {
    /// Aggregate search: course runs and programs.
    pub fn new(query: Expr) -> Self {
        Self {
            query,
            content_types: vec![ContentType::CourseRun, ContentType::Program],
            partner: None,
            aggregation_keys: Vec::new(),
            selected_facets: Vec::new(),
            selected_query_facets: Vec::new(),
            ordering: Ordering::Default,
            require_published: true,
        }
    }

    /// Course run search.
    pub fn course_runs(query: Expr) -> Self {
        Self {
            content_types: vec![ContentType::CourseRun],
            ..Self::new(query)
        }
    }

    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }
}

/// A matching document.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub id: DocId,
    pub doc: &'a Document,
    pub score: f32,
}

/// Typeahead matches, best first.
#[derive(Debug, Default)]
pub struct TypeaheadHits<'a> {
    pub runs: Vec<&'a RunDoc>,
    pub programs: Vec<&'a ProgramDoc>,
}

/// Filters of the courses resource.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// When set, courses must match and the run filters below are ignored.
    pub query: Option<Expr>,
    /// Empty matches every course.
    pub keys: Vec<String>,
    pub partner: Option<String>,
    pub include_hidden_course_runs: bool,
    pub marketable_course_runs_only: bool,
    pub marketable_enrollable_course_runs_with_archived: bool,
    pub published_course_runs_only: bool,
    pub include_deleted_programs: bool,
}

/// A course with the runs and programs selected by a [`CourseFilter`].
#[derive(Debug, Clone)]
pub struct CourseView<'a> {
    pub course: &'a CourseDoc,
    pub runs: Vec<&'a RunDoc>,
    pub programs: Vec<&'a ProgramRef>,
}

/// Search engine borrowing an index snapshot.
pub struct SearchEngine<'a> {
    docs: &'a DocTable,
    trigram_index: &'a TrigramIndex,
    synonyms: &'a Synonyms,
}

impl<'a> SearchEngine<'a> {
    pub fn new(docs: &'a DocTable, trigram_index: &'a TrigramIndex, synonyms: &'a Synonyms) -> Self {
        Self {
            docs,
            trigram_index,
            synonyms,
        }
    }

    /// All documents matching the request, ordered.
    pub fn search(&self, request: &SearchRequest, now: DateTime<Utc>) -> Vec<Hit<'a>> {
        let ctx = MatchContext {
            now,
            synonyms: self.synonyms,
        };

        let mut hits: Vec<Hit<'a>> = self
            .docs
            .iter()
            .filter(|(_, doc)| self.passes_filters(doc, request, now))
            .filter_map(|(id, doc)| {
                request
                    .query
                    .score(doc, &ctx)
                    .map(|score| Hit { id, doc, score })
            })
            .collect();

        let by_relevance = !request.query.is_all();
        hits.sort_by(|a, b| compare_hits(a, b, request.ordering, by_relevance));

        tracing::debug!(
            hits = hits.len(),
            content_types = ?request.content_types,
            "search complete"
        );
        hits
    }

    fn passes_filters(&self, doc: &Document, request: &SearchRequest, now: DateTime<Utc>) -> bool {
        if !request.content_types.contains(&doc.content_type()) {
            return false;
        }
        if let Some(partner) = &request.partner {
            if doc.partner() != partner {
                return false;
            }
        }
        if request.require_published && !doc.is_published() {
            return false;
        }
        if !request.aggregation_keys.is_empty()
            && !request.aggregation_keys.contains(&doc.aggregation_key())
        {
            return false;
        }
        if !request.selected_facets.iter().all(|facet| facet.matches(doc)) {
            return false;
        }
        if !request.selected_query_facets.is_empty() {
            let Document::CourseRun(run) = doc else {
                return false;
            };
            let availability = run.availability(now);
            if !request
                .selected_query_facets
                .iter()
                .all(|selected| *selected == availability)
            {
                return false;
            }
        }
        true
    }

    /// Field facet buckets over a hit list.
    pub fn field_facets(
        &self,
        hits: &[Hit<'a>],
        fields: &[FacetField],
    ) -> BTreeMap<FacetField, Vec<(String, usize)>> {
        count_field_facets(hits.iter().map(|hit| hit.doc), fields)
    }

    /// Course run counts per availability, in [`Availability::ALL`] order.
    /// Every run falls in exactly one bucket.
    pub fn query_facets(&self, hits: &[Hit<'a>], now: DateTime<Utc>) -> Vec<(Availability, usize)> {
        let mut counts: HashMap<Availability, usize> = HashMap::new();
        for hit in hits {
            if let Document::CourseRun(run) = hit.doc {
                *counts.entry(run.availability(now)).or_default() += 1;
            }
        }
        Availability::ALL
            .iter()
            .map(|availability| (*availability, counts.get(availability).copied().unwrap_or(0)))
            .collect()
    }

    /// Rank course runs and programs whose titles or organizations start with
    /// every word of `q`.
    ///
    /// At most one run per course is kept, before truncating to `result_count`.
    pub fn typeahead(
        &self,
        q: &str,
        partner: &str,
        result_count: usize,
        org_boost: f32,
    ) -> TypeaheadHits<'a> {
        let words = tokenize(q);
        if words.is_empty() {
            return TypeaheadHits::default();
        }
        let variants: Vec<Vec<String>> = words.iter().map(|w| self.synonyms.expand(w)).collect();

        let mut runs: Vec<(f32, &'a RunDoc)> = Vec::new();
        let mut programs: Vec<(f32, &'a ProgramDoc)> = Vec::new();

        for id in self.typeahead_candidates(&variants) {
            let Some(doc) = self.docs.get(id) else {
                continue;
            };
            if doc.partner() != partner || !doc.is_published() {
                continue;
            }
            let Some(score) = typeahead_score(doc, &variants, org_boost) else {
                continue;
            };
            match doc {
                Document::CourseRun(run) => runs.push((score, run)),
                Document::Program(program) => programs.push((score, program)),
                Document::Course(_) => {}
            }
        }

        runs.sort_by(|(sa, a), (sb, b)| {
            cmp_score(*sa, *sb)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.key.cmp(&b.key))
        });
        programs.sort_by(|(sa, a), (sb, b)| {
            cmp_score(*sa, *sb)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.uuid.cmp(&b.uuid))
        });

        let mut seen_courses = HashSet::new();
        let runs: Vec<&'a RunDoc> = runs
            .into_iter()
            .map(|(_, run)| run)
            .filter(|run| seen_courses.insert(run.course_key.as_str()))
            .take(result_count)
            .collect();
        let programs: Vec<&'a ProgramDoc> = programs
            .into_iter()
            .map(|(_, program)| program)
            .take(result_count)
            .collect();

        tracing::debug!(
            q,
            runs = runs.len(),
            programs = programs.len(),
            "typeahead complete"
        );
        TypeaheadHits { runs, programs }
    }

    /// Candidate documents for typeahead words (each with its synonyms).
    ///
    /// Words shorter than a trigram fall back to a linear scan.
    fn typeahead_candidates(&self, variants: &[Vec<String>]) -> Vec<DocId> {
        let indexable = variants
            .iter()
            .flatten()
            .all(|variant| variant.len() >= 3);
        if !indexable {
            return self.docs.iter().map(|(id, _)| id).collect();
        }

        let mut candidates: Option<HashSet<DocId>> = None;
        for word_variants in variants {
            let matches: HashSet<DocId> = word_variants
                .iter()
                .flat_map(|variant| self.trigram_index.query(&Trigram::extract(variant)))
                .collect();
            candidates = Some(match candidates {
                Some(current) => current.intersection(&matches).copied().collect(),
                None => matches,
            });
        }

        let mut ids: Vec<DocId> = candidates.unwrap_or_default().into_iter().collect();
        ids.sort_unstable();
        ids
    }

    /// For each identifier, whether the partner-scoped document it names
    /// matches `query`. Unknown identifiers are `false`.
    pub fn contains(
        &self,
        query: &Expr,
        partner: &str,
        course_run_ids: &[String],
        course_uuids: &[String],
        now: DateTime<Utc>,
    ) -> Vec<(String, bool)> {
        let ctx = MatchContext {
            now,
            synonyms: self.synonyms,
        };
        let matches = |content_type: ContentType, id: &str| {
            self.docs
                .find(content_type, id)
                .and_then(|doc_id| self.docs.get(doc_id))
                .is_some_and(|doc| doc.partner() == partner && query.matches(doc, &ctx))
        };

        let runs = course_run_ids
            .iter()
            .map(|id| (id.clone(), matches(ContentType::CourseRun, id)));
        let courses = course_uuids.iter().map(|raw| {
            let found = Uuid::parse_str(raw.trim())
                .is_ok_and(|uuid| matches(ContentType::Course, &uuid.to_string()));
            (raw.clone(), found)
        });
        runs.chain(courses).collect()
    }

    /// Courses selected by the filter, ordered by lower-cased key.
    pub fn courses(&self, filter: &CourseFilter, now: DateTime<Utc>) -> Vec<CourseView<'a>> {
        let ctx = MatchContext {
            now,
            synonyms: self.synonyms,
        };

        let mut views: Vec<CourseView<'a>> = self
            .docs
            .iter()
            .filter_map(|(_, doc)| match doc {
                Document::Course(course) => Some((doc, course)),
                _ => None,
            })
            .filter(|(_, course)| filter.partner.as_ref().map_or(true, |p| course.partner == *p))
            .filter(|(_, course)| filter.keys.is_empty() || filter.keys.contains(&course.key))
            .filter(|(doc, _)| filter.query.as_ref().map_or(true, |q| q.matches(doc, &ctx)))
            .map(|(_, course)| self.course_view(course, filter, now))
            .collect();

        views.sort_by(|a, b| {
            a.course
                .key
                .to_lowercase()
                .cmp(&b.course.key.to_lowercase())
                .then_with(|| a.course.key.cmp(&b.course.key))
        });
        views
    }

    /// Look up one course by key or uuid.
    pub fn course(&self, key_or_uuid: &str, filter: &CourseFilter, now: DateTime<Utc>) -> Option<CourseView<'a>> {
        let id = match Uuid::parse_str(key_or_uuid) {
            Ok(uuid) => self.docs.find(ContentType::Course, &uuid.to_string()),
            Err(_) => self.docs.find_course_key(key_or_uuid),
        }?;
        let Document::Course(course) = self.docs.get(id)? else {
            return None;
        };
        if filter.partner.as_ref().is_some_and(|p| course.partner != *p) {
            return None;
        }
        Some(self.course_view(course, filter, now))
    }

    fn course_view(&self, course: &'a CourseDoc, filter: &CourseFilter, now: DateTime<Utc>) -> CourseView<'a> {
        let runs = course
            .runs
            .iter()
            .filter_map(|id| match self.docs.get(*id) {
                Some(Document::CourseRun(run)) => Some(run),
                _ => None,
            })
            .filter(|run| filter.query.is_some() || run_passes(run, filter, now))
            .collect();

        let programs = course
            .programs
            .iter()
            .filter(|p| filter.include_deleted_programs || p.status != ProgramStatus::Deleted)
            .collect();

        CourseView {
            course,
            runs,
            programs,
        }
    }
}

fn run_passes(run: &RunDoc, filter: &CourseFilter, now: DateTime<Utc>) -> bool {
    let published = run.status == CourseRunStatus::Published;
    let marketable = published && !run.seat_types.is_empty();

    if run.hidden && !filter.include_hidden_course_runs {
        return false;
    }
    if filter.marketable_course_runs_only
        && !(marketable && !run.has_ended(now) && !run.enrollment_closed(now))
    {
        return false;
    }
    if filter.marketable_enrollable_course_runs_with_archived
        && !(marketable && run.enrollment_open(now))
    {
        return false;
    }
    if filter.published_course_runs_only && !published {
        return false;
    }
    true
}

/// Descending by score.
fn cmp_score(a: f32, b: f32) -> cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(cmp::Ordering::Equal)
}

/// `None` sorts after any date in both directions.
fn cmp_start(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> cmp::Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => cmp::Ordering::Less,
        (None, Some(_)) => cmp::Ordering::Greater,
        (None, None) => cmp::Ordering::Equal,
    }
}

fn compare_hits(a: &Hit<'_>, b: &Hit<'_>, ordering: Ordering, by_relevance: bool) -> cmp::Ordering {
    let explicit = match ordering {
        Ordering::Default => cmp::Ordering::Equal,
        Ordering::StartAsc => cmp_start(a.doc.start(), b.doc.start(), false),
        Ordering::StartDesc => cmp_start(a.doc.start(), b.doc.start(), true),
    };
    let relevance = if by_relevance {
        cmp_score(a.score, b.score)
    } else {
        cmp::Ordering::Equal
    };

    explicit
        .then(relevance)
        .then_with(|| a.doc.content_type().cmp(&b.doc.content_type()))
        .then_with(|| a.doc.sort_key().cmp(b.doc.sort_key()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sum over words of the best title match plus the boosted best organization
/// match. `None` when some word matches neither.
fn typeahead_score(doc: &Document, variants: &[Vec<String>], org_boost: f32) -> Option<f32> {
    let title_tokens = tokenize(doc.title());
    let org_tokens: Vec<String> = doc
        .organizations()
        .iter()
        .flat_map(|org| {
            let mut tokens = tokenize(&org.key);
            tokens.push(org.key.to_lowercase());
            tokens
        })
        .collect();

    let mut total = 0.0;
    for word_variants in variants {
        let title = best_token_score(&title_tokens, word_variants);
        let org = best_token_score(&org_tokens, &word_variants[..1]);
        if title == 0.0 && org == 0.0 {
            return None;
        }
        total += title + org_boost * org;
    }
    Some(total)
}

fn best_token_score(tokens: &[String], words: &[String]) -> f32 {
    let mut best: f32 = 0.0;
    for token in tokens {
        for word in words {
            if token == word {
                return EXACT_TOKEN_SCORE;
            }
            if token.starts_with(word.as_str()) {
                best = best.max(PREFIX_TOKEN_SCORE);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_docs::{course_doc, program_doc, run_doc};
    use crate::document::OrgRef;
    use chrono::Duration;
    use coursedex_core::model::PacingType;

    struct Fixture {
        docs: DocTable,
        trigrams: TrigramIndex,
        synonyms: Synonyms,
    }

    impl Fixture {
        fn new(docs: Vec<Document>) -> Self {
            let mut table = DocTable::new();
            let mut trigrams = TrigramIndex::new();
            for doc in docs {
                let text = doc.typeahead_text();
                let id = table.insert(doc);
                trigrams.add(id, &text);
            }
            Self {
                docs: table,
                trigrams,
                synonyms: Synonyms::default(),
            }
        }

        fn engine(&self) -> SearchEngine<'_> {
            SearchEngine::new(&self.docs, &self.trigrams, &self.synonyms)
        }
    }

    fn titled_run(key: &str, course_key: &str, title: &str) -> Document {
        let mut run = run_doc(key, course_key);
        run.title = title.to_string();
        Document::CourseRun(run)
    }

    fn ids(hits: &[Hit<'_>]) -> Vec<String> {
        hits.iter().map(|hit| hit.doc.id()).collect()
    }

    #[test]
    fn test_search_defaults_to_runs_and_programs() {
        let fixture = Fixture::new(vec![
            titled_run("run-b", "edX+B", "Beta"),
            Document::Course(course_doc("edX+B")),
            Document::Program(program_doc("Alpha Program")),
            titled_run("run-a", "edX+A", "Alpha"),
        ]);
        let hits = fixture
            .engine()
            .search(&SearchRequest::new(Expr::All), Utc::now());

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].doc.content_type(), ContentType::Program);
        assert_eq!(ids(&hits[1..]), vec!["run-a", "run-b"]);
    }

    #[test]
    fn test_search_applies_publish_gate_and_partner() {
        let mut hidden = run_doc("hidden", "edX+A");
        hidden.hidden = true;
        let mut unpublished = run_doc("unpublished", "edX+A");
        unpublished.status = CourseRunStatus::Unpublished;
        let mut other_partner = run_doc("other", "edX+A");
        other_partner.partner = "mit".to_string();
        let mut retired = program_doc("Retired");
        retired.status = ProgramStatus::Retired;

        let fixture = Fixture::new(vec![
            Document::CourseRun(run_doc("visible", "edX+A")),
            Document::CourseRun(hidden),
            Document::CourseRun(unpublished),
            Document::CourseRun(other_partner),
            Document::Program(retired),
        ]);
        let engine = fixture.engine();

        let request = SearchRequest::new(Expr::All).with_partner("edx");
        assert_eq!(ids(&engine.search(&request, Utc::now())), vec!["visible"]);

        let mut ungated = SearchRequest::course_runs(Expr::All).with_partner("edx");
        ungated.require_published = false;
        assert_eq!(engine.search(&ungated, Utc::now()).len(), 3);
    }

    #[test]
    fn test_search_orders_by_relevance_then_key() {
        let fixture = Fixture::new(vec![
            titled_run("run-a", "edX+A", "Intro to Python"),
            titled_run("run-b", "edX+B", "Data Science"),
            titled_run("run-c", "edX+C", "Python for Data Science"),
        ]);
        let request = SearchRequest::course_runs(Expr::parse("python OR science").unwrap());
        let hits = fixture.engine().search(&request, Utc::now());

        assert_eq!(ids(&hits), vec!["run-c", "run-a", "run-b"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_search_orders_by_start() {
        let now = Utc::now();
        let mut early = run_doc("early", "edX+A");
        early.start = Some(now - Duration::days(10));
        let mut late = run_doc("late", "edX+B");
        late.start = Some(now + Duration::days(10));
        let undated = run_doc("undated", "edX+C");

        let fixture = Fixture::new(vec![
            Document::CourseRun(undated),
            Document::CourseRun(late),
            Document::CourseRun(early),
        ]);
        let engine = fixture.engine();

        let mut request = SearchRequest::course_runs(Expr::All);
        request.ordering = Ordering::StartAsc;
        assert_eq!(ids(&engine.search(&request, now)), vec!["early", "late", "undated"]);

        request.ordering = Ordering::StartDesc;
        assert_eq!(ids(&engine.search(&request, now)), vec!["late", "early", "undated"]);
    }

    #[test]
    fn test_search_aggregation_keys() {
        let program = program_doc("Program");
        let program_key = format!("program:{}", program.uuid);
        let fixture = Fixture::new(vec![
            Document::CourseRun(run_doc("run-a", "edX+A")),
            Document::CourseRun(run_doc("run-b", "edX+B")),
            Document::Program(program),
        ]);

        let mut request = SearchRequest::new(Expr::All);
        request.aggregation_keys = vec!["courserun:edX+A".to_string(), program_key];
        let hits = fixture.engine().search(&request, Utc::now());

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc.content_type(), ContentType::Program);
        assert_eq!(hits[1].doc.id(), "run-a");
    }

    #[test]
    fn test_query_facets_partition_runs() {
        let now = Utc::now();
        let mut archived = run_doc("archived", "edX+A");
        archived.start = Some(now - Duration::days(100));
        archived.end = Some(now - Duration::days(1));
        let mut current = run_doc("current", "edX+B");
        current.start = Some(now - Duration::days(1));
        let mut soon = run_doc("soon", "edX+C");
        soon.start = Some(now + Duration::days(5));
        let upcoming = run_doc("upcoming", "edX+D");

        let fixture = Fixture::new(vec![
            Document::CourseRun(archived),
            Document::CourseRun(current),
            Document::CourseRun(soon),
            Document::CourseRun(upcoming),
        ]);
        let engine = fixture.engine();
        let hits = engine.search(&SearchRequest::course_runs(Expr::All), now);
        let counts = engine.query_facets(&hits, now);

        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), hits.len());
        assert!(counts.iter().all(|(_, c)| *c == 1));

        let mut narrowed = SearchRequest::course_runs(Expr::All);
        narrowed.selected_query_facets = vec![Availability::StartingSoon];
        assert_eq!(ids(&engine.search(&narrowed, now)), vec!["soon"]);
    }

    #[test]
    fn test_selected_facets_narrow() {
        let mut self_paced = run_doc("self", "edX+A");
        self_paced.pacing_type = PacingType::SelfPaced;
        let fixture = Fixture::new(vec![
            Document::CourseRun(self_paced),
            Document::CourseRun(run_doc("instructor", "edX+B")),
        ]);
        let engine = fixture.engine();

        let mut request = SearchRequest::course_runs(Expr::All);
        request.selected_facets = vec![SelectedFacet::new(FacetField::PacingType, "self_paced")];
        let hits = engine.search(&request, Utc::now());
        assert_eq!(ids(&hits), vec!["self"]);

        let facets = engine.field_facets(&hits, FacetField::COURSE_RUN);
        assert_eq!(facets[&FacetField::PacingType], vec![("self_paced".to_string(), 1)]);
    }

    #[test]
    fn test_typeahead_ranks_exact_over_prefix_and_dedupes_courses() {
        let fixture = Fixture::new(vec![
            titled_run("run-1", "edX+Test", "Testing Fundamentals"),
            titled_run("run-2", "edX+Test", "Testing Fundamentals"),
            titled_run("run-3", "edX+Soft", "Software Test Design"),
            titled_run("run-4", "edX+Chem", "Chemistry"),
        ]);
        let hits = fixture.engine().typeahead("test", "edx", 3, 2.0);

        let keys: Vec<&str> = hits.runs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["run-3", "run-1"]);
    }

    #[test]
    fn test_typeahead_org_boost_and_limit() {
        let mut boosted = run_doc("boosted", "MITx+A");
        boosted.title = "Circuits".to_string();
        boosted.organizations = vec![OrgRef {
            key: "MITx".to_string(),
            name: "MIT".to_string(),
        }];
        let plain = titled_run("plain", "edX+B", "MITx Alumni Stories");

        let mut docs = vec![plain, Document::CourseRun(boosted)];
        for n in 0..5 {
            let mut program = program_doc(&format!("MITx Program {n}"));
            program.organizations = vec![OrgRef {
                key: "MITx".to_string(),
                name: "MIT".to_string(),
            }];
            docs.push(Document::Program(program));
        }
        let fixture = Fixture::new(docs);
        let hits = fixture.engine().typeahead("mitx", "edx", 3, 2.0);

        assert_eq!(hits.runs[0].key, "boosted");
        assert_eq!(hits.programs.len(), 3);
        assert_eq!(hits.programs[0].title, "MITx Program 0");
    }

    #[test]
    fn test_typeahead_short_words_and_partner_scope() {
        let mut other = run_doc("other", "mit+A");
        other.partner = "mit".to_string();
        other.title = "Algebra".to_string();
        let fixture = Fixture::new(vec![
            titled_run("mine", "edX+A", "Algebra"),
            Document::CourseRun(other),
        ]);
        let hits = fixture.engine().typeahead("al", "edx", 3, 2.0);
        assert_eq!(hits.runs.len(), 1);
        assert_eq!(hits.runs[0].key, "mine");

        assert!(fixture.engine().typeahead("  ", "edx", 3, 2.0).runs.is_empty());
    }

    #[test]
    fn test_contains() {
        let mut course = course_doc("edX+A");
        course.partner = "edx".to_string();
        let uuid = course.uuid.to_string();
        let fixture = Fixture::new(vec![
            Document::CourseRun(run_doc("run-a", "edX+A")),
            Document::Course(course),
        ]);
        let query = Expr::parse("org:edX OR key:edX+A").unwrap();
        let result = fixture.engine().contains(
            &query,
            "edx",
            &["run-a".to_string(), "missing".to_string()],
            &[uuid.clone(), "not-a-uuid".to_string()],
            Utc::now(),
        );

        assert_eq!(
            result,
            vec![
                ("run-a".to_string(), true),
                ("missing".to_string(), false),
                (uuid, true),
                ("not-a-uuid".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_courses_filters_runs() {
        let now = Utc::now();
        let mut table = DocTable::new();
        let mut hidden = run_doc("hidden", "edX+A");
        hidden.hidden = true;
        let mut ended = run_doc("ended", "edX+A");
        ended.end = Some(now - Duration::days(1));
        let open = run_doc("open", "edX+A");

        let mut course = course_doc("edX+A");
        course.runs = vec![
            table.insert(Document::CourseRun(hidden)),
            table.insert(Document::CourseRun(ended)),
            table.insert(Document::CourseRun(open)),
        ];
        table.insert(Document::Course(course));
        table.insert(Document::Course(course_doc("Apple+Z")));

        let trigrams = TrigramIndex::new();
        let synonyms = Synonyms::default();
        let engine = SearchEngine::new(&table, &trigrams, &synonyms);

        let all = engine.courses(&CourseFilter::default(), now);
        let keys: Vec<&str> = all.iter().map(|v| v.course.key.as_str()).collect();
        assert_eq!(keys, vec!["Apple+Z", "edX+A"]);
        let run_keys: Vec<&str> = all[1].runs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(run_keys, vec!["ended", "open"]);

        let marketable = CourseFilter {
            marketable_course_runs_only: true,
            keys: vec!["edX+A".to_string()],
            ..CourseFilter::default()
        };
        let views = engine.courses(&marketable, now);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].runs.len(), 1);
        assert_eq!(views[0].runs[0].key, "open");

        let by_key = engine.course("edX+A", &CourseFilter::default(), now).unwrap();
        assert_eq!(by_key.course.key, "edX+A");
        let uuid = by_key.course.uuid.to_string();
        assert!(engine.course(&uuid, &CourseFilter::default(), now).is_some());
        assert!(engine.course("edX+Missing", &CourseFilter::default(), now).is_none());
    }
}
