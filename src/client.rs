use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{QuoteApiError, Result};
use crate::models::*;
use crate::source::QuoteSource;

pub const QUOTABLE_BASE_URL: &str = "https://api.quotable.io";
pub const JOKEAPI_BASE_URL: &str = "https://v2.jokeapi.dev";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_PAGE_SIZE: u32 = 20;

// ---------------------------------------------------------------------------
// Internal response handling
// ---------------------------------------------------------------------------

/// Shared logic for building a configured [`Client`] and making requests.
struct BaseClient {
    base_url: String,
    http: Client,
}

impl BaseClient {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the full URL for a given endpoint.
    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Issue a GET and return the status with the parsed body.
    ///
    /// Only transport failures are errors here. A 2xx body that is not JSON
    /// is a `Decode` error; other bodies fall back to an empty object.
    async fn send(&self, endpoint: &str, query: &[(String, String)]) -> Result<(u16, serde_json::Value)> {
        let url = self.url(endpoint);
        debug!(%url, ?query, "GET");
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let data = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(v) => v,
            Err(e) if (200..300).contains(&status) => {
                return Err(QuoteApiError::Decode(e.to_string()));
            }
            Err(_) => serde_json::Value::Object(serde_json::Map::new()),
        };
        Ok((status, data))
    }

    /// Map a status code and body to the payload or an error.
    fn check_status(status: u16, data: serde_json::Value) -> Result<serde_json::Value> {
        if (200..300).contains(&status) {
            return Ok(data);
        }

        let msg = data
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        match status {
            404 => Err(QuoteApiError::NotFound {
                message: if msg.is_empty() {
                    "Not found".into()
                } else {
                    msg
                },
            }),
            429 => Err(QuoteApiError::RateLimited {
                message: if msg.is_empty() {
                    "Too many requests".into()
                } else {
                    msg
                },
            }),
            _ => Err(QuoteApiError::Api {
                status,
                message: if msg.is_empty() {
                    format!("HTTP {status}")
                } else {
                    msg
                },
            }),
        }
    }

    async fn get(&self, endpoint: &str, query: &[(String, String)]) -> Result<serde_json::Value> {
        let (status, data) = self.send(endpoint, query).await?;
        Self::check_status(status, data)
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| QuoteApiError::Decode(e.to_string()))
}

/// Quote API tags are lowercase slugs: "Famous Quotes" -> "famous-quotes".
pub fn tag_slug(category: &str) -> String {
    category
        .trim()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// ===========================================================================
// Quote API
// ===========================================================================

/// Client for the public quote API.
///
/// ```no_run
/// use quotesphere_client::{Query, QuotableClient};
///
/// # async fn example() -> quotesphere_client::error::Result<()> {
/// let client = QuotableClient::new("https://api.quotable.io", None)?;
/// let quote = client.random(&Query::new("Wisdom", "")).await?;
/// println!("\"{}\" - {}", quote.text, quote.author);
/// # Ok(())
/// # }
/// ```
pub struct QuotableClient {
    base: BaseClient,
}

impl QuotableClient {
    /// Create a new client.
    ///
    /// * `base_url` – API root, e.g. `https://api.quotable.io`
    /// * `timeout`  – per-request timeout, 10 seconds when `None`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(base_url, timeout.unwrap_or(DEFAULT_TIMEOUT))?,
        })
    }

    /// Fetch one random quote matching the query.
    ///
    /// Without a search term the random endpoint does the filtering. With a
    /// search term, a page of search results is filtered by category and one
    /// entry is picked at random.
    pub async fn random(&self, query: &Query) -> Result<Quote> {
        match query.search_filter() {
            None => self.random_by_tag(query.category_filter()).await,
            Some(term) => self.random_from_search(term, query.category_filter()).await,
        }
    }

    async fn random_by_tag(&self, category: Option<&str>) -> Result<Quote> {
        let mut params: Vec<(String, String)> = vec![("limit".into(), "1".into())];
        if let Some(c) = category {
            params.push(("tags".into(), tag_slug(c)));
        }

        let data = self.base.get("/quotes/random", &params).await?;
        let quotes: Vec<QuotableQuote> = decode(data)?;
        quotes
            .into_iter()
            .next()
            .map(Quote::from)
            .ok_or(QuoteApiError::NoResults)
    }

    async fn random_from_search(&self, term: &str, category: Option<&str>) -> Result<Quote> {
        let params: Vec<(String, String)> = vec![
            ("query".into(), term.to_string()),
            ("limit".into(), SEARCH_PAGE_SIZE.to_string()),
        ];

        let data = self.base.get("/search/quotes", &params).await?;
        let page: QuotableSearchPage = decode(data)?;
        let wanted = category.map(tag_slug);

        let matches: Vec<QuotableQuote> = page
            .results
            .into_iter()
            .filter(|q| match &wanted {
                Some(slug) => q.tags.iter().any(|t| tag_slug(t) == *slug),
                None => true,
            })
            .collect();

        let pick = {
            let mut rng = rand::thread_rng();
            matches.choose(&mut rng).cloned()
        };
        pick.map(Quote::from).ok_or(QuoteApiError::NoResults)
    }
}

#[async_trait]
impl QuoteSource for QuotableClient {
    fn name(&self) -> &str {
        "quotable"
    }

    fn categories(&self) -> Vec<String> {
        [
            ALL_CATEGORIES,
            "Wisdom",
            "Inspirational",
            "Famous Quotes",
            "Life",
            "Love",
            "Success",
            "Technology",
            "Philosophy",
            "History",
            "Humorous",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    async fn retrieve(&self, query: &Query) -> Result<Quote> {
        match self.random(query).await {
            // The random endpoint answers 404 when no quote carries the tag.
            Err(QuoteApiError::NotFound { .. }) => Err(QuoteApiError::NoResults),
            other => other,
        }
    }
}

// ===========================================================================
// Joke API
// ===========================================================================

/// Client for the public joke API. Jokes are normalised into [`Quote`]s.
pub struct JokeApiClient {
    base: BaseClient,
}

impl JokeApiClient {
    pub const ATTRIBUTION: &'static str = "JokeAPI";

    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(base_url, timeout.unwrap_or(DEFAULT_TIMEOUT))?,
        })
    }

    /// Fetch one random joke matching the query.
    pub async fn random(&self, query: &Query) -> Result<Quote> {
        let category = query.category_filter().unwrap_or("Any");
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(term) = query.search_filter() {
            params.push(("contains".into(), term.to_string()));
        }

        let (status, data) = self.base.send(&format!("/joke/{category}"), &params).await?;

        // Error bodies may come with a 2xx or a 4xx status.
        let is_error_body = data.get("error").and_then(|v| v.as_bool()) == Some(true);
        if is_error_body {
            let body: JokeApiResponse = decode(data)?;
            if body.code == Some(JOKE_NO_MATCH_CODE) {
                return Err(QuoteApiError::NoResults);
            }
            return Err(QuoteApiError::Api {
                status,
                message: body.message.unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        let data = BaseClient::check_status(status, data)?;
        let joke: JokeApiResponse = decode(data)?;
        let text = joke
            .text()
            .ok_or_else(|| QuoteApiError::Decode("joke has no text".into()))?;
        let tags = joke.category.into_iter().collect();
        Ok(Quote::new(text, Self::ATTRIBUTION, tags))
    }
}

#[async_trait]
impl QuoteSource for JokeApiClient {
    fn name(&self) -> &str {
        "jokeapi"
    }

    fn categories(&self) -> Vec<String> {
        [
            ALL_CATEGORIES,
            "Programming",
            "Misc",
            "Dark",
            "Pun",
            "Spooky",
            "Christmas",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    async fn retrieve(&self, query: &Query) -> Result<Quote> {
        self.random(query).await
    }
}
