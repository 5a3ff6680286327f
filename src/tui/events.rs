use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use super::actions::{dispatch, Action};
use super::state::{AppScreen, AppState};

/// Minimum horizontal drag, in columns, that counts as a swipe.
pub const SWIPE_THRESHOLD: u16 = 10;

/// Main event handler: translate the event and dispatch the resulting action.
pub fn handle_event(event: Event, state: &mut AppState) {
    let action = match event {
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(Action::Quit)
        }
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key, state.screen),
        Event::Mouse(mouse) => map_mouse(mouse, state),
        _ => None,
    };
    if let Some(action) = action {
        dispatch(action, state);
    }
}

/// Single-letter shortcuts only fire without Ctrl, Alt or Super held.
fn is_plain(key: &KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

pub fn map_key(key: KeyEvent, screen: AppScreen) -> Option<Action> {
    match screen {
        AppScreen::Quote => map_quote_key(key),
        AppScreen::Search => map_search_key(key),
        AppScreen::Favorites => map_favorites_key(key),
    }
}

fn map_quote_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Left | KeyCode::BackTab => Some(Action::PrevCategory),
        KeyCode::Right | KeyCode::Tab => Some(Action::NextCategory),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) if is_plain(&key) => match c {
            'n' => Some(Action::NewQuote),
            'c' => Some(Action::Copy),
            's' => Some(Action::SaveFavorite),
            'h' => Some(Action::Share),
            '/' => Some(Action::FocusSearch),
            't' => Some(Action::ToggleTheme),
            'f' => Some(Action::ShowFavorites),
            'q' => Some(Action::Quit),
            _ => None,
        },
        _ => None,
    }
}

fn map_search_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => Some(Action::LeaveSearch),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Delete => Some(Action::SearchDelete),
        KeyCode::Left => Some(Action::SearchCursorLeft),
        KeyCode::Right => Some(Action::SearchCursorRight),
        KeyCode::Char(c) if is_plain(&key) => Some(Action::SearchInsert(c)),
        _ => None,
    }
}

fn map_favorites_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up => Some(Action::FavoritesUp),
        KeyCode::Down => Some(Action::FavoritesDown),
        KeyCode::Delete => Some(Action::RemoveFavorite),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(c) if is_plain(&key) => match c {
            'k' => Some(Action::FavoritesUp),
            'j' => Some(Action::FavoritesDown),
            'd' => Some(Action::RemoveFavorite),
            'f' | 'b' => Some(Action::Back),
            'q' => Some(Action::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Swipe left fetches a new quote, swipe right saves the current one.
pub fn classify_swipe(start_column: u16, end_column: u16, threshold: u16) -> Option<Action> {
    if end_column.saturating_add(threshold) < start_column {
        Some(Action::NewQuote)
    } else if end_column > start_column.saturating_add(threshold) {
        Some(Action::SaveFavorite)
    } else {
        None
    }
}

fn map_mouse(mouse: MouseEvent, state: &mut AppState) -> Option<Action> {
    if state.screen != AppScreen::Quote {
        return None;
    }
    match mouse.kind {
        MouseEventKind::Down(_) => {
            state.drag_start = Some(mouse.column);
            None
        }
        MouseEventKind::Up(_) => state
            .drag_start
            .take()
            .and_then(|start| classify_swipe(start, mouse.column, SWIPE_THRESHOLD)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quote_shortcuts() {
        assert_eq!(map_key(key(KeyCode::Char('n')), AppScreen::Quote), Some(Action::NewQuote));
        assert_eq!(map_key(key(KeyCode::Char('c')), AppScreen::Quote), Some(Action::Copy));
        assert_eq!(
            map_key(key(KeyCode::Char('s')), AppScreen::Quote),
            Some(Action::SaveFavorite)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('/')), AppScreen::Quote),
            Some(Action::FocusSearch)
        );
    }

    #[test]
    fn test_shortcuts_ignore_ctrl() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, AppScreen::Quote), None);
        let shifted = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted, AppScreen::Quote), None);
    }

    #[test]
    fn test_search_mode_captures_letters() {
        assert_eq!(
            map_key(key(KeyCode::Char('n')), AppScreen::Search),
            Some(Action::SearchInsert('n'))
        );
        assert_eq!(map_key(key(KeyCode::Esc), AppScreen::Search), Some(Action::LeaveSearch));
    }

    #[test]
    fn test_classify_swipe() {
        assert_eq!(classify_swipe(40, 20, 10), Some(Action::NewQuote));
        assert_eq!(classify_swipe(20, 40, 10), Some(Action::SaveFavorite));
        assert_eq!(classify_swipe(20, 30, 10), None);
        assert_eq!(classify_swipe(30, 20, 10), None);
    }
}
