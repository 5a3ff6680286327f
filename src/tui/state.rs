use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::coordinator::FetchCoordinator;
use crate::favorites::FavoritesStore;
use crate::models::{Outcome, Quote, RequestState};

/// How long copy/save/share feedback stays on screen.
pub(crate) const NOTIFICATION_TTL: Duration = Duration::from_secs(2);
/// How long the keyboard shortcut hint is shown after start-up.
pub(crate) const HINT_TTL: Duration = Duration::from_secs(5);

/// Represents the current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    /// The current quote with category bar.
    Quote,
    /// Quote screen with the search box focused.
    Search,
    /// List of saved favorites.
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Short-lived feedback message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub(crate) expires_at: Instant,
}

/// Main application state.
pub struct AppState {
    /// Current screen being displayed.
    pub(crate) screen: AppScreen,
    /// Latest state reported by the coordinator.
    pub(crate) request: RequestState,
    pub(crate) coordinator: FetchCoordinator,
    updates: UnboundedReceiver<RequestState>,
    pub(crate) store: Arc<dyn FavoritesStore>,
    pub(crate) share_command: Option<String>,

    /// Selectable categories; index 0 is unfiltered.
    pub(crate) categories: Vec<String>,
    pub(crate) selected_category: usize,

    // Search state
    pub(crate) search_query: String,
    /// Cursor position in search input, in chars.
    pub(crate) search_cursor_position: usize,

    // Favorites state
    pub(crate) favorites: Vec<Quote>,
    pub(crate) favorites_selection: usize,

    pub(crate) theme: Theme,
    pub(crate) notification: Option<Notification>,
    pub(crate) hint_until: Option<Instant>,
    /// Column where a mouse drag started.
    pub(crate) drag_start: Option<u16>,
    /// Should the application quit?
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        coordinator: FetchCoordinator,
        updates: UnboundedReceiver<RequestState>,
        store: Arc<dyn FavoritesStore>,
        share_command: Option<String>,
    ) -> Self {
        let categories = coordinator.categories();
        Self {
            screen: AppScreen::Quote,
            request: coordinator.state(),
            coordinator,
            updates,
            store,
            share_command,
            categories,
            selected_category: 0,
            search_query: String::new(),
            search_cursor_position: 0,
            favorites: Vec::new(),
            favorites_selection: 0,
            theme: Theme::Light,
            notification: None,
            hint_until: Some(Instant::now() + HINT_TTL),
            drag_start: None,
            should_quit: false,
        }
    }

    pub(crate) fn active_category(&self) -> &str {
        self.categories
            .get(self.selected_category)
            .map(String::as_str)
            .unwrap_or(crate::models::ALL_CATEGORIES)
    }

    /// The quote on screen, if the last request found one.
    pub(crate) fn displayed_quote(&self) -> Option<Quote> {
        match &self.request {
            RequestState::Succeeded(Outcome::Found(q)) => Some(q.clone()),
            _ => None,
        }
    }

    /// Drain coordinator updates into the view.
    pub fn sync_updates(&mut self) {
        while let Ok(state) = self.updates.try_recv() {
            self.request = state;
        }
    }

    /// Drop notifications and hints whose time is up.
    pub fn expire(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.expires_at <= now)
        {
            self.notification = None;
        }
        if self.hint_until.is_some_and(|t| t <= now) {
            self.hint_until = None;
        }
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        self.push_notification(message.into(), NotificationKind::Info);
    }

    pub(crate) fn notify_error(&mut self, message: impl Into<String>) {
        self.push_notification(message.into(), NotificationKind::Error);
    }

    fn push_notification(&mut self, message: String, kind: NotificationKind) {
        self.notification = Some(Notification {
            message,
            kind,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    pub(crate) fn reload_favorites(&mut self) {
        match self.store.load_favorites() {
            Ok(favorites) => {
                self.favorites = favorites;
                if self.favorites_selection >= self.favorites.len() {
                    self.favorites_selection = self.favorites.len().saturating_sub(1);
                }
            }
            Err(e) => self.notify_error(format!("Could not load favorites: {e}")),
        }
    }
}
