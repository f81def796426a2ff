use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// Where keyboard input is currently routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Prompt box focused: plain characters are prompt text
    Prompt,
    /// History sidebar open: single-letter commands
    History,
    /// Preview pane focused: navigation only
    Preview,
    /// A selection is pending a mode choice (manual vs AI edit)
    Selection,
    /// A text overlay (selection/edit/rename/...) is capturing input
    Overlay,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Cancel,
    CycleFocus,
    Confirm,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    PrevModel,
    NextModel,
    ToggleHistory,
    Undo,
    Redo,
    StartSelection,
    ManualEditMode,
    AiEditMode,
    CopyContent,
    CopyShareUrl,
    SaveVersion,
    Rename,
    Describe,
    InputChar(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, context: InputContext) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key, context));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent, context: InputContext) -> Action {
    // Global chords, valid in every context
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Esc, _) => return Action::Cancel,
        (KeyCode::Tab, _) => return Action::CycleFocus,
        (KeyCode::Enter, _) => return Action::Confirm,
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => return Action::ToggleHistory,
        (KeyCode::Char('z'), KeyModifiers::CONTROL) => return Action::Undo,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => return Action::Redo,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => return Action::StartSelection,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => return Action::CopyContent,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => return Action::CopyShareUrl,
        (KeyCode::Char('v'), KeyModifiers::CONTROL) => return Action::SaveVersion,
        (KeyCode::Up, _) => return Action::MoveUp,
        (KeyCode::Down, _) => return Action::MoveDown,
        (KeyCode::PageUp, _) => return Action::PageUp,
        (KeyCode::PageDown, _) => return Action::PageDown,
        _ => {}
    }

    match context {
        InputContext::Prompt | InputContext::Overlay => match (key.code, key.modifiers) {
            (KeyCode::Left, _) => Action::PrevModel,
            (KeyCode::Right, _) => Action::NextModel,
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                Action::InputChar(c)
            }
            (KeyCode::Backspace, _) => Action::DeleteChar,
            _ => Action::None,
        },
        InputContext::History => match key.code {
            KeyCode::Char('r') => Action::Rename,
            KeyCode::Char('d') => Action::Describe,
            KeyCode::Char('k') => Action::MoveUp,
            KeyCode::Char('j') => Action::MoveDown,
            _ => Action::None,
        },
        InputContext::Preview => match key.code {
            KeyCode::Char('k') => Action::MoveUp,
            KeyCode::Char('j') => Action::MoveDown,
            KeyCode::Left => Action::PrevModel,
            KeyCode::Right => Action::NextModel,
            _ => Action::None,
        },
        InputContext::Selection => match key.code {
            KeyCode::Char('e') => Action::ManualEditMode,
            KeyCode::Char('a') => Action::AiEditMode,
            _ => Action::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_in_every_context() {
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for context in [
            InputContext::Prompt,
            InputContext::History,
            InputContext::Preview,
            InputContext::Selection,
            InputContext::Overlay,
        ] {
            assert_eq!(key_to_action(ctrl_c, context), Action::Quit);
        }
    }

    #[test]
    fn test_prompt_context_plain_chars_are_input() {
        let a = key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(key_to_action(a, InputContext::Prompt), Action::InputChar('a'));

        let shifted = key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shifted, InputContext::Prompt), Action::InputChar('A'));

        let backspace = key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(key_to_action(backspace, InputContext::Prompt), Action::DeleteChar);
    }

    #[test]
    fn test_history_context_letter_commands() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('r'), KeyModifiers::NONE), InputContext::History),
            Action::Rename
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('d'), KeyModifiers::NONE), InputContext::History),
            Action::Describe
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('j'), KeyModifiers::NONE), InputContext::History),
            Action::MoveDown
        );
    }

    #[test]
    fn test_model_cycling_arrows_in_prompt() {
        assert_eq!(
            key_to_action(key(KeyCode::Left, KeyModifiers::NONE), InputContext::Prompt),
            Action::PrevModel
        );
        assert_eq!(
            key_to_action(key(KeyCode::Right, KeyModifiers::NONE), InputContext::Prompt),
            Action::NextModel
        );
    }

    #[test]
    fn test_global_chords() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('o'), KeyModifiers::CONTROL), InputContext::Prompt),
            Action::ToggleHistory
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('z'), KeyModifiers::CONTROL), InputContext::Preview),
            Action::Undo
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('r'), KeyModifiers::CONTROL), InputContext::History),
            Action::Redo
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('s'), KeyModifiers::CONTROL), InputContext::Prompt),
            Action::StartSelection
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('y'), KeyModifiers::CONTROL), InputContext::Prompt),
            Action::CopyContent
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('v'), KeyModifiers::CONTROL), InputContext::Prompt),
            Action::SaveVersion
        );
    }

    #[test]
    fn test_enter_and_esc_are_context_free() {
        assert_eq!(
            key_to_action(key(KeyCode::Enter, KeyModifiers::NONE), InputContext::Overlay),
            Action::Confirm
        );
        assert_eq!(
            key_to_action(key(KeyCode::Esc, KeyModifiers::NONE), InputContext::History),
            Action::Cancel
        );
    }

    #[test]
    fn test_selection_context_mode_keys() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('e'), KeyModifiers::NONE), InputContext::Selection),
            Action::ManualEditMode
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('a'), KeyModifiers::NONE), InputContext::Selection),
            Action::AiEditMode
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('x'), KeyModifiers::NONE), InputContext::Selection),
            Action::None
        );
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert_eq!(
            key_to_action(key(KeyCode::F(5), KeyModifiers::NONE), InputContext::Prompt),
            Action::None
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('x'), KeyModifiers::NONE), InputContext::Preview),
            Action::None
        );
    }
}
