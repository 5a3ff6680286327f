use tracing::debug;

use super::state::{AppScreen, AppState};
use crate::share::{copy_quote, share_quote, ShareMethod};

/// Everything the user can ask for, independent of how it was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewQuote,
    Copy,
    SaveFavorite,
    Share,
    FocusSearch,
    ToggleTheme,
    ShowFavorites,
    NextCategory,
    PrevCategory,
    SearchInsert(char),
    SearchBackspace,
    SearchDelete,
    SearchCursorLeft,
    SearchCursorRight,
    LeaveSearch,
    FavoritesUp,
    FavoritesDown,
    RemoveFavorite,
    Back,
    Quit,
}

/// Apply one action to the state.
pub fn dispatch(action: Action, state: &mut AppState) {
    debug!(?action, "dispatch");
    match action {
        Action::NewQuote => {
            state.coordinator.next_item();
        }
        Action::Copy => copy_current(state),
        Action::SaveFavorite => save_current(state),
        Action::Share => share_current(state),
        Action::FocusSearch => {
            state.search_cursor_position = state.search_query.chars().count();
            state.screen = AppScreen::Search;
        }
        Action::ToggleTheme => state.theme = state.theme.toggled(),
        Action::ShowFavorites => {
            state.reload_favorites();
            state.favorites_selection = 0;
            state.screen = AppScreen::Favorites;
        }
        Action::NextCategory => select_category(state, 1),
        Action::PrevCategory => select_category(state, -1),
        Action::SearchInsert(c) => {
            let idx = byte_index(&state.search_query, state.search_cursor_position);
            state.search_query.insert(idx, c);
            state.search_cursor_position += 1;
            search_changed(state);
        }
        Action::SearchBackspace => {
            if state.search_cursor_position > 0 {
                state.search_cursor_position -= 1;
                let idx = byte_index(&state.search_query, state.search_cursor_position);
                state.search_query.remove(idx);
                search_changed(state);
            }
        }
        Action::SearchDelete => {
            if state.search_cursor_position < state.search_query.chars().count() {
                let idx = byte_index(&state.search_query, state.search_cursor_position);
                state.search_query.remove(idx);
                search_changed(state);
            }
        }
        Action::SearchCursorLeft => {
            state.search_cursor_position = state.search_cursor_position.saturating_sub(1);
        }
        Action::SearchCursorRight => {
            if state.search_cursor_position < state.search_query.chars().count() {
                state.search_cursor_position += 1;
            }
        }
        Action::LeaveSearch | Action::Back => state.screen = AppScreen::Quote,
        Action::FavoritesUp => {
            state.favorites_selection = state.favorites_selection.saturating_sub(1);
        }
        Action::FavoritesDown => {
            if state.favorites_selection + 1 < state.favorites.len() {
                state.favorites_selection += 1;
            }
        }
        Action::RemoveFavorite => remove_selected_favorite(state),
        Action::Quit => state.should_quit = true,
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn search_changed(state: &mut AppState) {
    state.coordinator.debounced_search(state.search_query.clone());
}

fn select_category(state: &mut AppState, step: isize) {
    let len = state.categories.len();
    if len == 0 {
        return;
    }
    let next = (state.selected_category as isize + step).rem_euclid(len as isize) as usize;
    state.selected_category = next;
    let category = state.active_category().to_string();
    state.coordinator.select_category(category);
}

fn copy_current(state: &mut AppState) {
    let Some(quote) = state.displayed_quote() else {
        state.notify_error("Nothing to copy");
        return;
    };
    match copy_quote(&quote) {
        Ok(()) => state.notify("✓ Copied!"),
        Err(e) => state.notify_error(e.to_string()),
    }
}

fn save_current(state: &mut AppState) {
    let Some(quote) = state.displayed_quote() else {
        state.notify_error("Nothing to save");
        return;
    };
    match state.store.save_favorite(&quote) {
        Ok(true) => state.notify("✓ Saved!"),
        Ok(false) => state.notify("Already Saved"),
        Err(e) => state.notify_error(format!("Could not save favorite: {e}")),
    }
}

fn share_current(state: &mut AppState) {
    let Some(quote) = state.displayed_quote() else {
        state.notify_error("Nothing to share");
        return;
    };
    match share_quote(&quote, state.share_command.as_deref()) {
        Ok(ShareMethod::Command) => state.notify("✓ Shared!"),
        Ok(ShareMethod::Clipboard) => state.notify("Quote copied to clipboard!"),
        Err(e) => state.notify_error(e.to_string()),
    }
}

fn remove_selected_favorite(state: &mut AppState) {
    let Some(quote) = state.favorites.get(state.favorites_selection).cloned() else {
        return;
    };
    match state.store.remove_favorite(&quote) {
        Ok(_) => {
            state.reload_favorites();
            state.notify("Removed");
        }
        Err(e) => state.notify_error(format!("Could not remove favorite: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::coordinator::{ChannelRenderer, FetchCoordinator, FetchSettings};
    use crate::favorites::{FavoritesStore, MemoryStore};
    use crate::models::{Outcome, Quote, RequestState};
    use crate::source::EmbeddedSource;

    fn app() -> (AppState, Arc<MemoryStore>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let coordinator = FetchCoordinator::new(
            Arc::new(EmbeddedSource::builtin(Duration::ZERO)),
            Arc::new(ChannelRenderer::new(tx)),
            FetchSettings::default(),
        );
        let store = Arc::new(MemoryStore::new());
        (AppState::new(coordinator, rx, store.clone(), None), store)
    }

    fn show(state: &mut AppState, quote: &Quote) {
        state.request = RequestState::Succeeded(Outcome::Found(quote.clone()));
    }

    #[tokio::test]
    async fn test_save_favorite_twice_reports_already_saved() {
        let (mut state, store) = app();
        let quote = Quote::new("Books are a uniquely portable magic.", "Stephen King", vec![]);
        show(&mut state, &quote);

        dispatch(Action::SaveFavorite, &mut state);
        assert_eq!(state.notification.as_ref().unwrap().message, "✓ Saved!");
        dispatch(Action::SaveFavorite, &mut state);
        assert_eq!(state.notification.as_ref().unwrap().message, "Already Saved");
        assert_eq!(store.load_favorites().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_without_quote_is_an_error_notification() {
        let (mut state, store) = app();
        dispatch(Action::SaveFavorite, &mut state);
        assert!(store.load_favorites().unwrap().is_empty());
        assert_eq!(
            state.notification.as_ref().unwrap().kind,
            super::super::state::NotificationKind::Error
        );
    }

    #[tokio::test]
    async fn test_category_cycles_and_submits() {
        let (mut state, _) = app();
        dispatch(Action::PrevCategory, &mut state);
        let last = state.categories.len() - 1;
        assert_eq!(state.selected_category, last);
        assert_eq!(state.coordinator.active_query().category, state.categories[last]);

        dispatch(Action::NextCategory, &mut state);
        assert_eq!(state.selected_category, 0);
        assert!(state.coordinator.state().is_loading());
    }

    #[tokio::test]
    async fn test_search_editing_handles_multibyte_chars() {
        let (mut state, _) = app();
        dispatch(Action::FocusSearch, &mut state);
        for c in "café".chars() {
            dispatch(Action::SearchInsert(c), &mut state);
        }
        dispatch(Action::SearchCursorLeft, &mut state);
        dispatch(Action::SearchDelete, &mut state);
        assert_eq!(state.search_query, "caf");
        dispatch(Action::SearchBackspace, &mut state);
        assert_eq!(state.search_query, "ca");
        assert_eq!(state.search_cursor_position, 2);
        dispatch(Action::LeaveSearch, &mut state);
        assert_eq!(state.screen, AppScreen::Quote);
    }

    #[tokio::test]
    async fn test_remove_favorite_from_list() {
        let (mut state, store) = app();
        store
            .save_favorite(&Quote::new("One.", "A", vec![]))
            .unwrap();
        store
            .save_favorite(&Quote::new("Two.", "B", vec![]))
            .unwrap();

        dispatch(Action::ShowFavorites, &mut state);
        assert_eq!(state.favorites.len(), 2);
        dispatch(Action::FavoritesDown, &mut state);
        dispatch(Action::RemoveFavorite, &mut state);
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.favorites[0].text, "One.");
        assert_eq!(state.favorites_selection, 0);
    }
}
