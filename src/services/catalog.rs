use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::catalog::{MovieDetails, SearchHit},
};

/// The status envelope OMDb wraps around every payload. `Response` is the
/// string `"True"` or `"False"`; on `"False"` the `Error` field says why.
#[derive(Deserialize)]
struct OmdbStatus {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbStatus {
    fn is_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
}

/// Client for the external movie catalog (OMDb).
///
/// Stateless beyond the reqwest connection pool. Upstream failures of any
/// kind collapse to a generic upstream error; the raw shape is logged but
/// never returned to callers. Re-issuing `search` on every keystroke is
/// the caller's problem to avoid: the presentation layer coalesces input
/// over a 500ms quiet period before calling in.
#[derive(Clone)]
pub struct CatalogClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl CatalogClient {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Catalog API key not configured".to_string()))
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("catalog response unreadable: {}", e)))
    }

    /// Searches the catalog by free-text title.
    ///
    /// A blank query short-circuits to an empty list without touching the
    /// network or the key; "no matches" upstream is also an empty list,
    /// not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let key = self.api_key()?;
        let body = self.fetch(&[("apikey", key), ("s", query)]).await?;
        let hits = parse_search(&body)?;

        tracing::info!(query = %query, results = hits.len(), "Catalog search completed");
        Ok(hits)
    }

    /// Fetches the full record for one catalog identifier.
    pub async fn details(&self, imdb_id: &str) -> Result<MovieDetails> {
        let key = self.api_key()?;
        let body = self.fetch(&[("apikey", key), ("i", imdb_id)]).await?;
        parse_details(&body)
    }
}

/// Parses an OMDb search payload into hits. `Response: "False"` means no
/// matches and maps to an empty list.
pub(crate) fn parse_search(body: &str) -> Result<Vec<SearchHit>> {
    let status: OmdbStatus = sonic_rs::from_str(body).map_err(|e| {
        tracing::debug!(body = %body, "Unparseable catalog search payload");
        AppError::Upstream(format!("catalog search payload invalid: {}", e))
    })?;

    if status.is_failure() {
        tracing::debug!(reason = ?status.error, "Catalog reported no matches");
        return Ok(Vec::new());
    }

    let envelope: SearchEnvelope = sonic_rs::from_str(body)
        .map_err(|e| AppError::Upstream(format!("catalog search payload invalid: {}", e)))?;

    Ok(envelope.search)
}

/// Parses an OMDb detail payload. An unknown identifier surfaces as
/// not-found; anything unparseable collapses to an upstream error.
pub(crate) fn parse_details(body: &str) -> Result<MovieDetails> {
    let status: OmdbStatus = sonic_rs::from_str(body).map_err(|e| {
        tracing::debug!(body = %body, "Unparseable catalog detail payload");
        AppError::Upstream(format!("catalog detail payload invalid: {}", e))
    })?;

    if status.is_failure() {
        tracing::debug!(reason = ?status.error, "Catalog has no record for this id");
        return Err(AppError::NotFound);
    }

    sonic_rs::from_str(body)
        .map_err(|e| AppError::Upstream(format!("catalog detail payload invalid: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_key() -> CatalogClient {
        CatalogClient::new(None, "http://catalog.test.local".to_string())
    }

    #[tokio::test]
    async fn blank_query_short_circuits_before_key_check() {
        // No key configured and no server behind the URL: anything but the
        // short-circuit path would fail.
        let client = client_without_key();
        assert_eq!(client.search("").await.unwrap(), Vec::new());
        assert_eq!(client.search("   ").await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        let client = client_without_key();
        let err = client.search("matrix").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = client.details("tt0133093").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn search_payload_parses_hits() {
        let body = r#"{
            "Search": [
                {"imdbID":"tt0133093","Title":"The Matrix","Year":"1999","Type":"movie","Poster":"https://example.com/m.jpg"},
                {"imdbID":"tt0234215","Title":"The Matrix Reloaded","Year":"2003","Type":"movie","Poster":"N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let hits = parse_search(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].imdb_id, "tt0133093");
        assert_eq!(hits[1].poster, None);
    }

    #[test]
    fn no_matches_is_an_empty_list() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert_eq!(parse_search(body).unwrap(), Vec::new());
    }

    #[test]
    fn garbage_search_payload_is_an_upstream_error() {
        let err = parse_search("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn detail_payload_parses_record() {
        let body = r#"{
            "imdbID": "tt0133093",
            "Title": "The Matrix",
            "Year": "1999",
            "Director": "Lana Wachowski, Lilly Wachowski",
            "imdbRating": "8.7",
            "Poster": "N/A",
            "Plot": "A computer hacker learns about the true nature of reality.",
            "Actors": "Keanu Reeves, Laurence Fishburne",
            "Genre": "Action, Sci-Fi",
            "Runtime": "136 min",
            "Type": "movie",
            "Response": "True"
        }"#;

        let details = parse_details(body).unwrap();
        assert_eq!(details.title, "The Matrix");
        assert_eq!(details.poster, None);
        assert_eq!(details.genre.as_deref(), Some("Action, Sci-Fi"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let err = parse_details(body).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
