use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    OpenBlog,
    CloseBlog,
    DeleteBlog,
    NewBlogStart,
    SearchStart,
    ClearSearch,
    ShowHelp,
    HideHelp,
    // URL input actions
    UrlInputChar(char),
    UrlInputBackspace,
    UrlInputConfirm,
    UrlInputCancel,
    // Tag search input actions
    SearchInputChar(char),
    SearchInputBackspace,
    SearchInputConfirm,
    SearchInputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    url_input_active: bool,
    search_input_active: bool,
    blog_open: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // URL input mode
    if url_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::UrlInputConfirm),
            KeyCode::Esc => Some(AppAction::UrlInputCancel),
            KeyCode::Backspace => Some(AppAction::UrlInputBackspace),
            KeyCode::Char(c) => Some(AppAction::UrlInputChar(c)),
            _ => None,
        };
    }

    // Tag search input mode
    if search_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::SearchInputConfirm),
            KeyCode::Esc => Some(AppAction::SearchInputCancel),
            KeyCode::Backspace => Some(AppAction::SearchInputBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchInputChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Enter, _) => Some(AppAction::OpenBlog),
        (KeyCode::Esc, _) => {
            if blog_open {
                Some(AppAction::CloseBlog)
            } else {
                Some(AppAction::ClearSearch)
            }
        }

        (KeyCode::Char('n'), _) => Some(AppAction::NewBlogStart),
        (KeyCode::Char('s'), _) => Some(AppAction::SearchStart),
        (KeyCode::Char('d'), _) => Some(AppAction::DeleteBlog),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
