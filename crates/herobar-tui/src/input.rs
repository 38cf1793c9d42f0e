use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    NextPage,
    PrevPage,
    /// Jump to a page by index (0-based)
    GoToPage(usize),
    /// Tap a header icon or the avatar
    TapIcon(String),
    /// Tap outside any popover
    Dismiss,
    Refresh,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,

        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => Action::NextPage,
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => Action::PrevPage,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::GoToPage(c as usize - '1' as usize)
        }

        (KeyCode::Char('a'), KeyModifiers::NONE) => icon_action(app, 0),
        (KeyCode::Char('n'), KeyModifiers::NONE) => icon_action(app, 1),
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::TapIcon(avatar_id(app)),
        (KeyCode::Esc, _) => Action::Dismiss,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,
        _ => Action::None,
    }
}

/// Handle a mouse event: the wheel scrolls, clicks dismiss popovers
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollUp => Action::ScrollUp,
        MouseEventKind::Down(MouseButton::Left) => Action::Dismiss,
        _ => Action::None,
    }
}

fn icon_action(app: &App, index: usize) -> Action {
    app.header
        .icons
        .get(index)
        .map_or(Action::None, |id| Action::TapIcon(id.clone()))
}

/// The avatar opens the last configured popover
fn avatar_id(app: &App) -> String {
    app.header
        .popovers
        .last()
        .cloned()
        .unwrap_or_else(|| "profile".to_string())
}

/// Apply an action to the app
pub fn apply_action(app: &mut App, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollDown => app.scroll_down()?,
        Action::ScrollUp => app.scroll_up()?,
        Action::NextPage => app.next_page()?,
        Action::PrevPage => app.prev_page()?,
        Action::GoToPage(page) => app.swipe_to(page)?,
        Action::TapIcon(id) => app.tap_icon(&id)?,
        Action::Dismiss => app.tap_outside()?,
        Action::Refresh => app.refresh()?,
        Action::None => {}
    }
    Ok(())
}
