//! The data source capability the coordinator fetches through.
//!
//! Two HTTP bindings live in [`crate::client`]; the built-in quote list is
//! [`EmbeddedSource`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::time::sleep;

use crate::client::{JokeApiClient, QuotableClient};
use crate::config::{SourceConfig, SourceKind};
use crate::error::{QuoteApiError, Result};
use crate::models::{Query, Quote, ALL_CATEGORIES};

/// Something that can produce a random [`Quote`] for a [`Query`].
///
/// `QuoteApiError::NoResults` (and `Decode`) mean the query matched nothing;
/// any other error is treated as a transient failure and retried.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Selectable categories. The first entry is the unfiltered value.
    fn categories(&self) -> Vec<String>;

    async fn retrieve(&self, query: &Query) -> Result<Quote>;
}

// ---------------------------------------------------------------------------
// Embedded list
// ---------------------------------------------------------------------------

const EMBEDDED_QUOTES: &[(&str, &str, &str)] = &[
    (
        "The unexamined life is not worth living.",
        "Socrates",
        "Philosophy",
    ),
    (
        "Two things are infinite: the universe and human stupidity; and I'm not sure about the universe.",
        "Albert Einstein",
        "Science",
    ),
    (
        "To love and be loved is to feel the sun from both sides.",
        "David Viscott",
        "Love",
    ),
    (
        "It is better to remain silent and be thought a fool than to speak and remove all doubt.",
        "Mark Twain",
        "Humor",
    ),
    (
        "Art enables us to find ourselves and lose ourselves at the same time.",
        "Thomas Merton",
        "Art",
    ),
    (
        "The cure for anything is salt water: sweat, tears, or the sea.",
        "Isak Dinesen",
        "Nature",
    ),
    (
        "Those who cannot remember the past are condemned to repeat it.",
        "George Santayana",
        "History",
    ),
    (
        "Books are a uniquely portable magic.",
        "Stephen King",
        "Literature",
    ),
    (
        "The only true wisdom is in knowing you know nothing.",
        "Socrates",
        "Wisdom",
    ),
    (
        "Life is really simple, but we insist on making it complicated.",
        "Confucius",
        "Life",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
        "Success",
    ),
];

/// An in-process source over a fixed list of quotes, with simulated latency.
pub struct EmbeddedSource {
    quotes: Vec<Quote>,
    latency: Duration,
}

impl EmbeddedSource {
    pub fn new(quotes: Vec<Quote>, latency: Duration) -> Self {
        Self { quotes, latency }
    }

    /// The built-in list; each quote carries its category as the only tag.
    pub fn builtin(latency: Duration) -> Self {
        let quotes = EMBEDDED_QUOTES
            .iter()
            .map(|(text, author, category)| Quote::new(*text, *author, vec![category.to_string()]))
            .collect();
        Self::new(quotes, latency)
    }

    /// All quotes matching the query.
    ///
    /// The search term matches text, author or category case-insensitively;
    /// the category must match exactly unless the query is unfiltered.
    pub fn filter(&self, query: &Query) -> Vec<&Quote> {
        let term = query.search_filter().map(str::to_lowercase);
        let category = query.category_filter();

        self.quotes
            .iter()
            .filter(|q| {
                let matches_search = match &term {
                    None => true,
                    Some(t) => {
                        q.text.to_lowercase().contains(t)
                            || q.author.to_lowercase().contains(t)
                            || q.category().is_some_and(|c| c.to_lowercase().contains(t))
                    }
                };
                let matches_category = match category {
                    None => true,
                    Some(c) => q.category() == Some(c),
                };
                matches_search && matches_category
            })
            .collect()
    }
}

#[async_trait]
impl QuoteSource for EmbeddedSource {
    fn name(&self) -> &str {
        "embedded"
    }

    fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for q in &self.quotes {
            if let Some(c) = q.category() {
                if !categories.iter().any(|existing| existing == c) {
                    categories.push(c.to_string());
                }
            }
        }
        categories
    }

    async fn retrieve(&self, query: &Query) -> Result<Quote> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        let matches = self.filter(query);
        let pick = {
            let mut rng = rand::thread_rng();
            matches.choose(&mut rng).map(|q| (*q).clone())
        };
        pick.ok_or(QuoteApiError::NoResults)
    }
}

/// Build the configured data source.
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn QuoteSource>> {
    let timeout = Some(Duration::from_secs(config.request_timeout_secs));
    let source: Arc<dyn QuoteSource> = match config.kind {
        SourceKind::Quotable => Arc::new(QuotableClient::new(&config.resolved_base_url(), timeout)?),
        SourceKind::JokeApi => Arc::new(JokeApiClient::new(&config.resolved_base_url(), timeout)?),
        SourceKind::Embedded => Arc::new(EmbeddedSource::builtin(Duration::from_millis(
            config.embedded_latency_ms,
        ))),
    };
    Ok(source)
}
