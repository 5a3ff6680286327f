//! QuoteSphere client library for Rust.
//!
//! Fetches a random quote (or joke) from a public web API or a built-in
//! list, with bounded retry, debounced search and a staleness guard that
//! keeps a slow old response from replacing a newer one.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use quotesphere_client::{
//!     ChannelRenderer, FetchCoordinator, FetchSettings, Query, QuotableClient,
//! };
//!
//! # async fn example() -> quotesphere_client::error::Result<()> {
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let source = Arc::new(QuotableClient::new("https://api.quotable.io", None)?);
//! let coordinator = FetchCoordinator::new(
//!     source,
//!     Arc::new(ChannelRenderer::new(tx)),
//!     FetchSettings::default(),
//! );
//!
//! coordinator.submit(Query::new("Wisdom", ""));
//! while let Some(state) = rx.recv().await {
//!     println!("{state:?}");
//!     if state.is_terminal() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod models;
pub mod share;
pub mod source;
pub mod tui;

// Re-export the main public types at the crate root for convenience.
pub use client::{JokeApiClient, QuotableClient};
pub use config::{Config, SourceKind};
pub use coordinator::{ChannelRenderer, FetchCoordinator, FetchSettings, Renderer};
pub use error::{ActionError, ConfigError, QuoteApiError, StorageError};
pub use favorites::{FavoritesStore, JsonFileStore, MemoryStore, FAVORITES_KEY};
pub use models::{ErrorKind, Failure, Outcome, Query, Quote, RequestState, ALL_CATEGORIES};
pub use source::{build_source, EmbeddedSource, QuoteSource};
