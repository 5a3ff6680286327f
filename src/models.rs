use serde::{Deserialize, Serialize};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Filter for one fetch: a category and a free-text search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub category: String,
    pub search_term: String,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
        }
    }
}

impl Query {
    pub fn new(category: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search_term: search_term.into(),
        }
    }

    /// `"All"` (any case) or an empty category means unfiltered.
    pub fn is_unfiltered_category(&self) -> bool {
        let c = self.category.trim();
        c.is_empty() || c.eq_ignore_ascii_case(ALL_CATEGORIES)
    }

    /// The category filter, or `None` when unfiltered.
    pub fn category_filter(&self) -> Option<&str> {
        if self.is_unfiltered_category() {
            None
        } else {
            Some(self.category.trim())
        }
    }

    /// The trimmed search term, or `None` when empty.
    pub fn search_filter(&self) -> Option<&str> {
        let term = self.search_term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A quote or joke normalised from any data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }

    /// Display category; the first tag.
    pub fn category(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Favorites treat two quotes as the same entry when text and author match.
    pub fn same_entry(&self, other: &Quote) -> bool {
        self.text == other.text && self.author == other.author
    }
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// A successful resolution: a quote, or the "no results" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(Quote),
    NoResults,
}

impl Outcome {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Outcome::Found(q) => Some(q),
            Outcome::NoResults => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, no HTTP status available.
    Network,
    /// Non-2xx HTTP response.
    Http(u16),
    /// Valid response with nothing in it. Never ends up in `Failed`.
    EmptyResult,
}

/// Terminal failure of a request after the retry budget ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// The coordinator's single live request slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    /// `attempt` is 1-based.
    Loading { seq: u64, attempt: u32 },
    Succeeded(Outcome),
    Failed(Failure),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Succeeded(_) | RequestState::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Wire shapes: quote API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct QuotableQuote {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<QuotableQuote> for Quote {
    fn from(q: QuotableQuote) -> Self {
        Quote::new(q.content, q.author, q.tags)
    }
}

/// Paginated envelope of the quote API's search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotableSearchPage {
    #[serde(default)]
    pub count: u64,
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    #[serde(default)]
    pub results: Vec<QuotableQuote>,
}

// ---------------------------------------------------------------------------
// Wire shapes: joke API
// ---------------------------------------------------------------------------

/// JokeAPI error code for "no matching joke found".
pub const JOKE_NO_MATCH_CODE: u16 = 106;

#[derive(Debug, Clone, Deserialize)]
pub struct JokeApiResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub joke_type: Option<String>,
    #[serde(default)]
    pub joke: Option<String>,
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
}

impl JokeApiResponse {
    /// Joke text: the single line, or setup and delivery on separate lines.
    pub fn text(&self) -> Option<String> {
        match self.joke_type.as_deref() {
            Some("single") => self.joke.clone(),
            Some("twopart") => match (&self.setup, &self.delivery) {
                (Some(setup), Some(delivery)) => Some(format!("{setup}\n{delivery}")),
                _ => None,
            },
            _ => self.joke.clone(),
        }
    }
}
