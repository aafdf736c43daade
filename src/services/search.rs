//! Combined local/provider title search.
//!
//! A query is answered from two sides: the first stored row whose title
//! contains the query, and a capped list of provider candidates. The merge
//! deduplicates by IMDb id, labels every hit with its provenance, and
//! reports the overall origin of the result set.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::clients::omdb::{ExternalCandidate, OmdbClient};
use crate::db::Store;
use crate::domain::{ContentKind, Provenance, SearchSource};
use crate::entities::content;

/// Source of externally fetched title candidates.
///
/// The aggregation below only needs "candidates or a transport error" from
/// the provider side; tests substitute a canned implementation.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(
        &self,
        title: &str,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ExternalCandidate>>;
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(
        &self,
        title: &str,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ExternalCandidate>> {
        self.search(title, kind).await
    }
}

/// One entry of a combined search answer, in wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Stored row id; absent for provider-only hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentKind,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub source: Provenance,
    pub already_watched: bool,
}

impl SearchHit {
    #[must_use]
    pub fn from_stored(model: &content::Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title.clone(),
            original_title: model.original_title.clone(),
            description: model.description.clone(),
            content_type: ContentKind::from_provider_type(&model.content_type),
            release_year: model.release_year,
            imdb_rating: model.imdb_rating,
            imdb_id: model.imdb_id.clone(),
            poster_url: model.poster_url.clone(),
            genre: model.genre.clone(),
            director: model.director.clone(),
            cast: model.actors_cast.clone(),
            source: Provenance::Database,
            already_watched: false,
        }
    }

    #[must_use]
    pub fn from_candidate(candidate: ExternalCandidate) -> Self {
        Self {
            id: None,
            title: candidate.title,
            original_title: candidate.original_title,
            description: candidate.description,
            content_type: candidate.kind,
            release_year: candidate.release_year,
            imdb_rating: candidate.imdb_rating,
            imdb_id: candidate.imdb_id,
            poster_url: candidate.poster_url,
            genre: candidate.genre,
            director: candidate.director,
            cast: candidate.cast,
            source: Provenance::External,
            already_watched: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub source: SearchSource,
    pub data: Vec<SearchHit>,
    pub message: String,
}

/// Merges the stored match (if any) with provider candidates into the final
/// capped list, stored match first.
///
/// Candidates whose IMDb id was already emitted are dropped; a candidate
/// without an id is never treated as a duplicate, so two id-less hits with
/// the same title both survive. At most `cap - 1` provider hits join a
/// stored match, keeping the total at `cap`.
#[must_use]
pub fn merge_results(
    query: &str,
    local: Option<SearchHit>,
    candidates: Vec<ExternalCandidate>,
    cap: usize,
) -> SearchOutcome {
    let mut seen_imdb_ids: HashSet<String> = HashSet::new();

    if let Some(hit) = &local
        && let Some(imdb_id) = &hit.imdb_id
    {
        seen_imdb_ids.insert(imdb_id.clone());
    }

    let budget = cap.saturating_sub(usize::from(local.is_some()));
    let mut external_hits: Vec<SearchHit> = Vec::new();

    for candidate in candidates {
        if external_hits.len() >= budget {
            break;
        }

        if let Some(imdb_id) = &candidate.imdb_id
            && !seen_imdb_ids.insert(imdb_id.clone())
        {
            continue;
        }

        external_hits.push(SearchHit::from_candidate(candidate));
    }

    let had_local = local.is_some();
    let had_external = !external_hits.is_empty();

    let mut data = Vec::with_capacity(external_hits.len() + usize::from(had_local));
    if let Some(hit) = local {
        data.push(hit);
    }
    data.append(&mut external_hits);

    let source = match (had_local, had_external) {
        (true, true) => SearchSource::Mixed,
        (true, false) => SearchSource::Database,
        (false, true) => SearchSource::External,
        (false, false) => {
            return SearchOutcome {
                source: SearchSource::NotFound,
                data: Vec::new(),
                message: format!("No matches found for '{query}'"),
            };
        }
    };

    SearchOutcome {
        source,
        data,
        message: "Search results found".to_string(),
    }
}

pub struct SearchService {
    store: Store,
    provider: Arc<dyn MetadataProvider>,
    max_results: usize,
}

impl SearchService {
    #[must_use]
    pub fn new(store: Store, provider: Arc<dyn MetadataProvider>, max_results: usize) -> Self {
        Self {
            store,
            provider,
            max_results,
        }
    }

    /// Answers a title query from the store and the provider combined.
    ///
    /// The kind hint narrows the provider call only; the stored lookup
    /// deliberately ignores it so an exact local match of the other kind
    /// still surfaces. A provider failure degrades to provider-side
    /// silence rather than failing the whole search; only store errors
    /// propagate.
    pub async fn search(
        &self,
        query: &str,
        kind_hint: Option<ContentKind>,
    ) -> Result<SearchOutcome> {
        let local = self
            .store
            .find_content_by_title(query)
            .await?
            .map(|model| SearchHit::from_stored(&model));

        let candidates = match self.provider.lookup(query, kind_hint).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Metadata provider lookup failed for '{}': {}", query, e);
                Vec::new()
            }
        };

        let outcome = merge_results(query, local, candidates, self.max_results);

        info!(
            "Search '{}' resolved as {} with {} hit(s)",
            query,
            outcome.source,
            outcome.data.len()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewContent;

    struct CannedProvider {
        candidates: Vec<ExternalCandidate>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl MetadataProvider for CannedProvider {
        async fn lookup(
            &self,
            _title: &str,
            _kind: Option<ContentKind>,
        ) -> Result<Vec<ExternalCandidate>> {
            if self.fail {
                anyhow::bail!("provider unreachable");
            }
            Ok(self.candidates.clone())
        }
    }

    async fn store_with_dune() -> Store {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store");

        store
            .insert_content_if_absent(NewContent {
                title: "Dune".to_string(),
                original_title: Some("Dune".to_string()),
                description: None,
                kind: ContentKind::Movie,
                release_year: Some(2021),
                imdb_rating: Some(8.0),
                imdb_id: Some("tt1160419".to_string()),
                poster_url: None,
                genre: None,
                director: None,
                actors_cast: None,
                language: None,
                country: None,
            })
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    async fn stored_row_and_provider_combine_without_duplicates() {
        let store = store_with_dune().await;
        let provider = Arc::new(CannedProvider {
            candidates: vec![
                candidate("Dune", Some("tt1160419")),
                candidate("Dune: Part Two", Some("tt15239678")),
            ],
            fail: false,
        });

        let service = SearchService::new(store, provider, 5);
        let outcome = service.search("Dune", None).await.unwrap();

        assert_eq!(outcome.source, SearchSource::Mixed);
        assert_eq!(outcome.data.len(), 2);
        assert_eq!(outcome.data[0].source, Provenance::Database);
        assert_eq!(outcome.data[1].imdb_id.as_deref(), Some("tt15239678"));
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_stored_match() {
        let store = store_with_dune().await;
        let provider = Arc::new(CannedProvider {
            candidates: Vec::new(),
            fail: true,
        });

        let service = SearchService::new(store, provider, 5);
        let outcome = service.search("dune", None).await.unwrap();

        assert_eq!(outcome.source, SearchSource::Database);
        assert_eq!(outcome.data.len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_with_no_stored_match_is_not_found() {
        let store = store_with_dune().await;
        let provider = Arc::new(CannedProvider {
            candidates: Vec::new(),
            fail: true,
        });

        let service = SearchService::new(store, provider, 5);
        let outcome = service.search("Severance", None).await.unwrap();

        assert_eq!(outcome.source, SearchSource::NotFound);
        assert!(outcome.data.is_empty());
    }

    fn stored_dune() -> content::Model {
        content::Model {
            id: 1,
            title: "Dune".to_string(),
            original_title: Some("Dune".to_string()),
            description: Some("Paul Atreides goes to Arrakis.".to_string()),
            content_type: "movie".to_string(),
            release_year: Some(2021),
            imdb_rating: Some(8.0),
            imdb_id: Some("tt1160419".to_string()),
            poster_url: None,
            genre: Some("Sci-Fi".to_string()),
            director: Some("Denis Villeneuve".to_string()),
            actors_cast: None,
            language: None,
            country: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn candidate(title: &str, imdb_id: Option<&str>) -> ExternalCandidate {
        ExternalCandidate {
            title: title.to_string(),
            original_title: Some(title.to_string()),
            description: None,
            kind: ContentKind::Movie,
            release_year: Some(2021),
            imdb_rating: Some(8.0),
            imdb_id: imdb_id.map(str::to_string),
            poster_url: None,
            genre: None,
            director: None,
            cast: None,
        }
    }

    #[test]
    fn stored_match_plus_new_candidate() {
        let local = SearchHit::from_stored(&stored_dune());
        let candidates = vec![
            candidate("Dune", Some("tt1160419")),
            candidate("Dune: Part Two", Some("tt15239678")),
        ];

        let outcome = merge_results("Dune", Some(local), candidates, 5);

        assert_eq!(outcome.source, SearchSource::Mixed);
        assert_eq!(outcome.data.len(), 2);
        assert_eq!(outcome.data[0].source, Provenance::Database);
        assert_eq!(outcome.data[0].title, "Dune");
        assert_eq!(outcome.data[1].source, Provenance::External);
        assert_eq!(outcome.data[1].title, "Dune: Part Two");
    }

    #[test]
    fn nothing_found_is_an_outcome_not_an_error() {
        let outcome = merge_results("Unknown Film", None, Vec::new(), 5);

        assert_eq!(outcome.source, SearchSource::NotFound);
        assert!(outcome.data.is_empty());
        assert!(outcome.message.contains("Unknown Film"));
    }

    #[test]
    fn stored_match_alone_is_database_sourced() {
        let local = SearchHit::from_stored(&stored_dune());
        let outcome = merge_results(
            "Dune",
            Some(local),
            vec![candidate("Dune", Some("tt1160419"))],
            5,
        );

        assert_eq!(outcome.source, SearchSource::Database);
        assert_eq!(outcome.data.len(), 1);
        assert_eq!(outcome.data[0].source, Provenance::Database);
    }

    #[test]
    fn candidates_alone_are_external_sourced() {
        let outcome = merge_results("Dune", None, vec![candidate("Dune", Some("tt1160419"))], 5);

        assert_eq!(outcome.source, SearchSource::External);
        assert_eq!(outcome.data.len(), 1);
        assert_eq!(outcome.data[0].source, Provenance::External);
        assert_eq!(outcome.data[0].id, None);
    }

    #[test]
    fn cap_holds_with_stored_match() {
        let local = SearchHit::from_stored(&stored_dune());
        let candidates = vec![
            candidate("Dune 1984", Some("tt0087182")),
            candidate("Dune: Part Two", Some("tt15239678")),
            candidate("Dune: Drifter", Some("tt21113006")),
            candidate("Jodorowsky's Dune", Some("tt1935156")),
            candidate("Children of Dune", Some("tt0287839")),
            candidate("Dune 2000", Some("tt0142032")),
        ];

        let outcome = merge_results("Dune", Some(local), candidates, 5);

        assert_eq!(outcome.data.len(), 5);
        assert_eq!(outcome.data[0].source, Provenance::Database);
        // Budget for provider hits is cap minus the stored match.
        assert_eq!(
            outcome
                .data
                .iter()
                .filter(|h| h.source == Provenance::External)
                .count(),
            4
        );
    }

    #[test]
    fn no_two_hits_share_an_imdb_id() {
        let local = SearchHit::from_stored(&stored_dune());
        let candidates = vec![
            candidate("Dune", Some("tt1160419")),
            candidate("Dune Again", Some("tt1160419")),
            candidate("Dune: Part Two", Some("tt15239678")),
        ];

        let outcome = merge_results("Dune", Some(local), candidates, 5);

        let mut ids: Vec<&String> = outcome
            .data
            .iter()
            .filter_map(|h| h.imdb_id.as_ref())
            .collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert_eq!(outcome.data.len(), 2);
    }

    #[test]
    fn idless_candidates_never_deduplicate() {
        let candidates = vec![
            candidate("Obscure Short", None),
            candidate("Obscure Short", None),
        ];

        let outcome = merge_results("Obscure Short", None, candidates, 5);

        assert_eq!(outcome.data.len(), 2);
    }

    #[test]
    fn provider_overflow_is_cut_at_cap() {
        let candidates: Vec<ExternalCandidate> = (0..10)
            .map(|i| candidate(&format!("Hit {i}"), Some(&format!("tt{i:07}"))))
            .collect();

        let outcome = merge_results("Hit", None, candidates, 5);

        assert_eq!(outcome.data.len(), 5);
        assert_eq!(outcome.source, SearchSource::External);
    }
}
