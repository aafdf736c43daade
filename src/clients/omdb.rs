use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::ContentKind;

pub const OMDB_API: &str = "http://www.omdbapi.com/";

/// A provider result normalized into the shapes the rest of the crate
/// works with. `imdb_id` stays optional; the provider occasionally omits it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCandidate {
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub kind: ContentKind,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchPage {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbDetail {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
}

impl OmdbDetail {
    /// Converts a raw detail payload into a candidate. Returns `None` when
    /// the payload has no title, which the free tier produces for some ids.
    #[must_use]
    pub fn into_candidate(self) -> Option<ExternalCandidate> {
        let title = self.title?;
        let kind = ContentKind::from_provider_type(self.media_type.as_deref().unwrap_or_default());

        Some(ExternalCandidate {
            original_title: Some(title.clone()),
            title,
            description: none_if_na(self.plot),
            kind,
            release_year: self.year.as_deref().and_then(parse_release_year),
            imdb_rating: self
                .imdb_rating
                .as_deref()
                .filter(|raw| *raw != "N/A")
                .and_then(|raw| raw.parse().ok()),
            imdb_id: self.imdb_id,
            poster_url: none_if_na(self.poster),
            genre: none_if_na(self.genre),
            director: none_if_na(self.director),
            cast: none_if_na(self.actors),
        })
    }
}

fn none_if_na(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "N/A")
}

/// Series years arrive as ranges ("2019–2023", "2019–"); the leading year
/// is the release year. Plain movie years ("1994") parse as-is.
fn parse_release_year(raw: &str) -> Option<i32> {
    if raw == "N/A" {
        return None;
    }
    raw.split('\u{2013}').next()?.trim().parse().ok()
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_results: usize,
}

impl OmdbClient {
    #[must_use]
    pub const fn new(
        client: Client,
        api_key: String,
        base_url: String,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            max_results,
        }
    }

    /// Title search followed by a detail fetch per hit, capped at
    /// `max_results`. A "no matches" reply from the provider is an empty
    /// list, not an error; only transport failures on the search call
    /// surface to the caller.
    pub async fn search(
        &self,
        title: &str,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ExternalCandidate>> {
        let mut url = format!(
            "{}?apikey={}&s={}&plot=short",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(title)
        );
        if let Some(kind) = kind {
            url.push_str("&type=");
            url.push_str(kind.as_str());
        }

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OMDb API error: {} - {}", status, body));
        }

        let page: OmdbSearchPage = response.json().await?;

        if page.response != "True" {
            debug!(
                "OMDb found nothing for '{}': {}",
                title,
                page.error.as_deref().unwrap_or("no error detail")
            );
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();

        for item in page.search.into_iter().take(self.max_results) {
            let Some(imdb_id) = item.imdb_id else {
                continue;
            };

            // One bad detail fetch drops that item, never the whole search.
            match self.fetch_detail(&imdb_id).await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => debug!("OMDb has no detail record for {}", imdb_id),
                Err(e) => warn!("OMDb detail fetch failed for {}: {}", imdb_id, e),
            }
        }

        Ok(candidates)
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<Option<ExternalCandidate>> {
        let url = format!(
            "{}?apikey={}&i={}&plot=short",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(imdb_id)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "OMDb detail error for {}: {}",
                imdb_id,
                response.status()
            ));
        }

        let detail: OmdbDetail = response.json().await?;

        if detail.response != "True" {
            return Ok(None);
        }

        Ok(detail.into_candidate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(title: &str, media_type: &str) -> OmdbDetail {
        OmdbDetail {
            response: "True".to_string(),
            title: Some(title.to_string()),
            year: Some("2021".to_string()),
            media_type: Some(media_type.to_string()),
            plot: Some("A plot.".to_string()),
            imdb_rating: Some("8.0".to_string()),
            imdb_id: Some("tt1160419".to_string()),
            poster: Some("http://img.example/p.jpg".to_string()),
            genre: Some("Sci-Fi".to_string()),
            director: Some("Denis Villeneuve".to_string()),
            actors: Some("Timothee Chalamet".to_string()),
        }
    }

    #[test]
    fn parse_release_year_plain_and_range() {
        assert_eq!(parse_release_year("1994"), Some(1994));
        assert_eq!(parse_release_year("2019\u{2013}2023"), Some(2019));
        assert_eq!(parse_release_year("2019\u{2013}"), Some(2019));
        assert_eq!(parse_release_year("N/A"), None);
        assert_eq!(parse_release_year("soon"), None);
    }

    #[test]
    fn candidate_maps_series_type() {
        let candidate = detail("Dark", "series").into_candidate().unwrap();
        assert_eq!(candidate.kind, ContentKind::Series);

        let candidate = detail("Dune", "movie").into_candidate().unwrap();
        assert_eq!(candidate.kind, ContentKind::Movie);

        // Unknown provider types fall back to movie.
        let candidate = detail("Dune", "game").into_candidate().unwrap();
        assert_eq!(candidate.kind, ContentKind::Movie);
    }

    #[test]
    fn candidate_strips_na_fields() {
        let mut raw = detail("Dune", "movie");
        raw.imdb_rating = Some("N/A".to_string());
        raw.poster = Some("N/A".to_string());
        raw.plot = Some("N/A".to_string());

        let candidate = raw.into_candidate().unwrap();
        assert_eq!(candidate.imdb_rating, None);
        assert_eq!(candidate.poster_url, None);
        assert_eq!(candidate.description, None);
        assert_eq!(candidate.release_year, Some(2021));
    }

    #[test]
    fn candidate_requires_title() {
        let mut raw = detail("Dune", "movie");
        raw.title = None;
        assert!(raw.into_candidate().is_none());
    }

    #[test]
    fn unparseable_rating_becomes_none() {
        let mut raw = detail("Dune", "movie");
        raw.imdb_rating = Some("great".to_string());
        assert_eq!(raw.into_candidate().unwrap().imdb_rating, None);
    }
}
