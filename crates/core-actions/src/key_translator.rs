//! Key -> Action translation.
//!
//! Pure mapping from `(Mode, KeyEvent)` to an optional `Action`. No state is
//! carried between keys; the prompt sub-state lives in `EditorState::mode`.
//!
//! Normal mode bindings:
//! | key                | action      |
//! |--------------------|-------------|
//! | printable char     | InsertChar  |
//! | Enter              | Newline     |
//! | Backspace          | DeleteChar  |
//! | Tab                | Tab         |
//! | arrows             | Move        |
//! | Ctrl-Z / Ctrl-Y    | Undo / Redo |
//! | Ctrl-S             | Save        |
//! | Ctrl-F             | Find        |
//! | Ctrl-N / F3        | FindNext    |
//! | Ctrl-P / Shift-F3  | FindPrev    |
//! | Ctrl-Q / Ctrl-C    | Quit        |
//!
//! While a prompt is capturing input only the prompt keys map: printable
//! chars, Backspace, Enter (submit), Esc / Ctrl-C (cancel).

use crate::Action;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;
use core_text::Direction;

pub fn translate_key(mode: Mode, key: &KeyEvent) -> Option<Action> {
    match mode {
        Mode::Normal => normal_map(key),
        Mode::CapturingAuxiliaryInput => prompt_map(key),
    }
}

/// Translate any decoded input event. Resize is handled by the runtime and maps to nothing.
pub fn translate_input(mode: Mode, event: &InputEvent) -> Option<Action> {
    match event {
        InputEvent::Key(key) => translate_key(mode, key),
        InputEvent::CtrlC => translate_key(mode, &KeyEvent::ctrl('c')),
        InputEvent::Paste(text) => match mode {
            Mode::Normal => Some(Action::Paste(text.clone())),
            Mode::CapturingAuxiliaryInput => None,
        },
        InputEvent::Resize(..) => None,
    }
}

fn is_text_char(key: &KeyEvent, c: char) -> bool {
    !c.is_control() && !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
}

fn normal_map(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL)
        && let KeyCode::Char(c) = key.code
    {
        return match c.to_ascii_lowercase() {
            'z' => Some(Action::Undo),
            'y' => Some(Action::Redo),
            's' => Some(Action::Save),
            'f' => Some(Action::Find),
            'n' => Some(Action::FindNext),
            'p' => Some(Action::FindPrev),
            'q' | 'c' => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(c) if is_text_char(key, c) => Some(Action::InsertChar(c)),
        KeyCode::Enter => Some(Action::Newline),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Tab => Some(Action::Tab),
        KeyCode::Up => Some(Action::Move(Direction::Up)),
        KeyCode::Down => Some(Action::Move(Direction::Down)),
        KeyCode::Left => Some(Action::Move(Direction::Left)),
        KeyCode::Right => Some(Action::Move(Direction::Right)),
        KeyCode::F(3) if key.mods.contains(KeyModifiers::SHIFT) => Some(Action::FindPrev),
        KeyCode::F(3) => Some(Action::FindNext),
        _ => None,
    }
}

fn prompt_map(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.mods.contains(KeyModifiers::CTRL) => Some(Action::PromptCancel),
        KeyCode::Char(c) if is_text_char(key, c) => Some(Action::PromptChar(c)),
        KeyCode::Backspace => Some(Action::PromptBackspace),
        KeyCode::Enter => Some(Action::PromptSubmit),
        KeyCode::Esc => Some(Action::PromptCancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn printable_chars_insert_in_normal_mode() {
        assert_eq!(
            translate_key(Mode::Normal, &key(KeyCode::Char('a'))),
            Some(Action::InsertChar('a'))
        );
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            translate_key(Mode::Normal, &shifted),
            Some(Action::InsertChar('A'))
        );
        let alt = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(translate_key(Mode::Normal, &alt), None);
    }

    #[test]
    fn control_bindings() {
        let cases = [
            ('z', Action::Undo),
            ('y', Action::Redo),
            ('s', Action::Save),
            ('f', Action::Find),
            ('n', Action::FindNext),
            ('p', Action::FindPrev),
            ('q', Action::Quit),
            ('c', Action::Quit),
        ];
        for (c, expected) in cases {
            assert_eq!(
                translate_key(Mode::Normal, &KeyEvent::ctrl(c)),
                Some(expected),
                "ctrl-{c}"
            );
        }
        assert_eq!(translate_key(Mode::Normal, &KeyEvent::ctrl('k')), None);
    }

    #[test]
    fn navigation_and_editing_keys() {
        assert_eq!(
            translate_key(Mode::Normal, &key(KeyCode::Left)),
            Some(Action::Move(Direction::Left))
        );
        assert_eq!(
            translate_key(Mode::Normal, &key(KeyCode::Enter)),
            Some(Action::Newline)
        );
        assert_eq!(
            translate_key(Mode::Normal, &key(KeyCode::Backspace)),
            Some(Action::DeleteChar)
        );
        assert_eq!(translate_key(Mode::Normal, &key(KeyCode::Tab)), Some(Action::Tab));
        assert_eq!(
            translate_key(Mode::Normal, &key(KeyCode::F(3))),
            Some(Action::FindNext)
        );
        assert_eq!(
            translate_key(
                Mode::Normal,
                &KeyEvent::new(KeyCode::F(3), KeyModifiers::SHIFT)
            ),
            Some(Action::FindPrev)
        );
        assert_eq!(translate_key(Mode::Normal, &key(KeyCode::Esc)), None);
    }

    #[test]
    fn prompt_mode_only_maps_prompt_keys() {
        let m = Mode::CapturingAuxiliaryInput;
        assert_eq!(
            translate_key(m, &key(KeyCode::Char('x'))),
            Some(Action::PromptChar('x'))
        );
        assert_eq!(translate_key(m, &key(KeyCode::Enter)), Some(Action::PromptSubmit));
        assert_eq!(
            translate_key(m, &key(KeyCode::Backspace)),
            Some(Action::PromptBackspace)
        );
        assert_eq!(translate_key(m, &key(KeyCode::Esc)), Some(Action::PromptCancel));
        assert_eq!(translate_key(m, &KeyEvent::ctrl('c')), Some(Action::PromptCancel));
        assert_eq!(translate_key(m, &key(KeyCode::Up)), None);
        assert_eq!(translate_key(m, &KeyEvent::ctrl('s')), None);
    }

    #[test]
    fn input_events_route_by_mode() {
        assert_eq!(
            translate_input(Mode::Normal, &InputEvent::CtrlC),
            Some(Action::Quit)
        );
        assert_eq!(
            translate_input(Mode::CapturingAuxiliaryInput, &InputEvent::CtrlC),
            Some(Action::PromptCancel)
        );
        assert_eq!(
            translate_input(Mode::Normal, &InputEvent::Paste("a\nb".into())),
            Some(Action::Paste("a\nb".into()))
        );
        assert_eq!(
            translate_input(Mode::CapturingAuxiliaryInput, &InputEvent::Paste("a".into())),
            None
        );
        assert_eq!(translate_input(Mode::Normal, &InputEvent::Resize(80, 24)), None);
    }
}
