//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  While the search query is
//! being edited, keys go to the query line instead.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_normal_key`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.editing_query {
        handle_query_key(app, key.code);
    } else {
        handle_normal_key(app, key.code);
    }
}

fn handle_query_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_query_edit(),
        KeyCode::Enter => app.submit_query(),
        KeyCode::Backspace => {
            app.query.pop();
        }
        KeyCode::Char(c) => app.query.push(c),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_to_end(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char('/') => app.start_query_edit(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('f') => app.toggle_favourite(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use livescroll_news::paging::Channel;
    use tokio_util::sync::CancellationToken;

    use crate::app::{Command, Tab};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new("us", 20, &CancellationToken::new()).0
    }

    #[test]
    fn q_and_esc_quit() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('q')));
        assert!(a.quit);

        let mut b = app();
        handle_key_event(&mut b, press(KeyCode::Esc));
        assert!(b.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut a = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key_event(&mut a, key);
        assert!(!a.quit);
    }

    #[test]
    fn typing_a_query_then_enter_searches() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('/')));
        assert!(a.editing_query);
        assert_eq!(a.tab, Tab::Search);

        for c in "rusty".chars() {
            handle_key_event(&mut a, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut a, press(KeyCode::Backspace));
        // Keys are query text while editing.
        assert!(!a.quit);
        handle_key_event(&mut a, press(KeyCode::Enter));

        assert!(!a.editing_query);
        assert_eq!(
            a.take_commands(),
            vec![Command::Request(Channel::Search, "rust".into())]
        );
    }

    #[test]
    fn esc_while_editing_only_cancels_the_edit() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('/')));
        handle_key_event(&mut a, press(KeyCode::Esc));
        assert!(!a.editing_query);
        assert!(!a.quit);
    }

    #[test]
    fn tab_keys_switch_tabs() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Tab));
        assert_eq!(a.tab, Tab::Search);
        handle_key_event(&mut a, press(KeyCode::BackTab));
        assert_eq!(a.tab, Tab::Headlines);
    }

    #[test]
    fn r_retries_headlines() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('r')));
        assert_eq!(
            a.take_commands(),
            vec![Command::Request(Channel::Headlines, "us".into())]
        );
    }
}
