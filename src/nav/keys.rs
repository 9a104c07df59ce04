use crate::app::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// What a key means to the form hosting the typeahead fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormCommand {
    // Forwarded to the focused field as a keydown
    Field(Key),
    Next,
    Prev,
    // Plain focus loss, no Tab
    Blur,
    Edit(EditOp),
    Clear,
    CopyYaml,
    Quit,
}

pub fn map_key(ev: &KeyEvent) -> Option<FormCommand> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = ev.modifiers.contains(KeyModifiers::CONTROL);
    let cmd = match ev.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => FormCommand::Quit,
        KeyCode::Char('x') if ctrl => FormCommand::Clear,
        KeyCode::Char('y') if ctrl => FormCommand::CopyYaml,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => FormCommand::Edit(EditOp::Insert(c)),
        KeyCode::Up => FormCommand::Field(Key::ArrowUp),
        KeyCode::Down => FormCommand::Field(Key::ArrowDown),
        KeyCode::Enter => FormCommand::Field(Key::Enter),
        KeyCode::Tab if ev.modifiers.contains(KeyModifiers::SHIFT) => FormCommand::Prev,
        KeyCode::Tab => FormCommand::Next,
        KeyCode::BackTab => FormCommand::Prev,
        KeyCode::Esc => FormCommand::Blur,
        KeyCode::Backspace => FormCommand::Edit(EditOp::Backspace),
        KeyCode::Delete => FormCommand::Edit(EditOp::Delete),
        KeyCode::Left => FormCommand::Edit(EditOp::Left),
        KeyCode::Right => FormCommand::Edit(EditOp::Right),
        KeyCode::Home => FormCommand::Edit(EditOp::Home),
        KeyCode::End => FormCommand::Edit(EditOp::End),
        _ => return None,
    };
    Some(cmd)
}

/// Parses a headless key script such as `down,down,enter,type:pe,tab`.
/// Unknown tokens are skipped with a warning.
pub fn parse_script(script: &str) -> Vec<FormCommand> {
    let mut out = Vec::new();
    for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(text) = token.strip_prefix("type:") {
            out.extend(text.chars().map(|c| FormCommand::Edit(EditOp::Insert(c))));
            continue;
        }
        let cmd = match token {
            "up" => FormCommand::Field(Key::ArrowUp),
            "down" => FormCommand::Field(Key::ArrowDown),
            "enter" => FormCommand::Field(Key::Enter),
            "tab" => FormCommand::Next,
            "backtab" => FormCommand::Prev,
            "esc" => FormCommand::Blur,
            "clear" => FormCommand::Clear,
            "bs" => FormCommand::Edit(EditOp::Backspace),
            other => {
                tracing::warn!(token = other, "unknown key script token");
                continue;
            }
        };
        out.push(cmd);
    }
    out
}
