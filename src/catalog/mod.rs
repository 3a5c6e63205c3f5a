//! External movie-catalog bridge.
//!
//! A thin, key-authenticated HTTP GET client against a TMDB-style
//! catalog API. Lookups and searches are pass-through with no local
//! caching; the catalog owns movie metadata, this service only stores
//! references to it by external id.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

/// A movie as described by the external catalog.
///
/// Field names on the wire follow the catalog's response schema; the
/// subset kept here mirrors what the UI renders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogMovie {
    /// Catalog-owned movie id.
    pub id: i64,
    /// Original title.
    #[serde(rename = "original_title")]
    pub title: String,
    /// Poster image path, when the catalog has one.
    #[serde(rename = "poster_path")]
    pub poster: Option<String>,
    /// Release date string as reported by the catalog.
    #[serde(rename = "release_date", default)]
    pub release_date: Option<String>,
}

/// Search response envelope returned by the catalog.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<CatalogMovie>,
}

/// Key-authenticated client for the external movie catalog.
///
/// Constructed once at startup; reuses a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl CatalogClient {
    /// API version segment of the catalog paths.
    const API_VERSION: &'static str = "3";

    /// Creates a new catalog client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Fetches a single catalog movie by its external id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the catalog reports no such
    /// movie and [`ApiError::Upstream`] on any other catalog failure.
    pub async fn get_movie(&self, external_id: i64) -> Result<CatalogMovie, ApiError> {
        let url = format!(
            "{}/{}/movie/{external_id}",
            self.base_url,
            Self::API_VERSION
        );

        let response = self.send(&url, &[]).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::not_found("catalog movie", external_id));
        }
        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        response
            .json::<CatalogMovie>()
            .await
            .map_err(|e| ApiError::Upstream(format!("decode catalog movie: {e}")))
    }

    /// Searches the catalog by free-text term.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] on any catalog failure.
    pub async fn search_movies(&self, term: &str) -> Result<Vec<CatalogMovie>, ApiError> {
        let url = format!("{}/{}/search/movie", self.base_url, Self::API_VERSION);

        let response = self.send(&url, &[("query", term)]).await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        let envelope = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ApiError::Upstream(format!("decode catalog search: {e}")))?;

        Ok(envelope.results)
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ApiError> {
        self.http
            .get(url)
            .query(query)
            .bearer_auth(&self.auth_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("catalog request: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fight_club_json() -> serde_json::Value {
        serde_json::json!({
            "id": 550,
            "original_title": "Fight Club",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "release_date": "1999-10-15"
        })
    }

    #[tokio::test]
    async fn get_movie_maps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/550"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fight_club_json()))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "token");
        let movie = client.get_movie(550).await;
        let Ok(movie) = movie else {
            panic!("expected movie");
        };
        assert_eq!(movie.id, 550);
        assert_eq!(movie.title, "Fight Club");
        assert_eq!(movie.release_date.as_deref(), Some("1999-10-15"));
    }

    #[tokio::test]
    async fn get_movie_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/999999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "token");
        let result = client.get_movie(999_999).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn get_movie_5xx_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/550"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "token");
        let result = client.get_movie(550).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn search_unwraps_results_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "fight"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "results": [fight_club_json()] })),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "token");
        let movies = client.search_movies("fight").await;
        let Ok(movies) = movies else {
            panic!("expected results");
        };
        assert_eq!(movies.len(), 1);
        assert_eq!(movies.first().map(|m| m.id), Some(550));
    }

    #[tokio::test]
    async fn search_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "token");
        let result = client.search_movies("fight").await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }
}
