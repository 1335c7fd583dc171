//! Board rendering
//!
//! Produces the whole screen as one string; the main loop writes it
//! after every event. Lines end in "\r\n" because the terminal is in
//! raw mode.

use crate::dialog::{VoiceDialog, DIALOG_TITLE};
use crate::phrases::{Phrase, BOARD_COLUMNS, PHRASES};
use crate::speech::EngineState;
use crate::state::State;
use unicode_width::UnicodeWidthStr;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const NEWLINE: &str = "\r\n";
const CELL_GAP: usize = 3;

/// Render the full screen for a terminal `cols` wide
pub fn render(state: &State, cols: u16) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    out.push_str(crate::APP_NAME);
    out.push_str(NEWLINE);
    out.push_str(NEWLINE);

    match &state.dialog {
        Some(dialog) => render_dialog(&mut out, dialog),
        None => render_board(&mut out, cols as usize),
    }

    out.push_str(NEWLINE);
    out.push_str(&status_line(state));
    out.push_str(NEWLINE);
    out.push_str(&help_line(state));
    out.push_str(NEWLINE);
    out
}

fn key_label(phrase: &Phrase) -> String {
    format!("[{}] {}", phrase.key, phrase.label)
}

fn text_label(phrase: &Phrase) -> String {
    format!("    {}", phrase.text)
}

/// Pad to a display width; accented text is narrower than its byte length
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn render_board(out: &mut String, cols: usize) {
    let cell = PHRASES
        .iter()
        .map(|p| key_label(p).width().max(text_label(p).width()))
        .max()
        .unwrap_or(0)
        + CELL_GAP;

    // Too narrow for the grid: one phrase per line
    if cell * BOARD_COLUMNS > cols {
        for phrase in PHRASES.iter() {
            out.push_str(&format!("{} - {}", key_label(phrase), phrase.text));
            out.push_str(NEWLINE);
        }
        return;
    }

    for row in PHRASES.chunks(BOARD_COLUMNS) {
        let keys: Vec<String> = row.iter().map(|p| pad(&key_label(p), cell)).collect();
        let texts: Vec<String> = row.iter().map(|p| pad(&text_label(p), cell)).collect();
        out.push_str(keys.concat().trim_end());
        out.push_str(NEWLINE);
        out.push_str(texts.concat().trim_end());
        out.push_str(NEWLINE);
        out.push_str(NEWLINE);
    }
}

fn render_dialog(out: &mut String, dialog: &VoiceDialog) {
    out.push_str(DIALOG_TITLE);
    out.push_str(NEWLINE);
    out.push_str(NEWLINE);

    for (i, title) in dialog.titles().iter().enumerate() {
        let marker = if dialog.highlighted() == Some(i) { ">" } else { " " };
        out.push_str(&format!("  {} {}", marker, title));
        out.push_str(NEWLINE);
    }
}

fn status_line(state: &State) -> String {
    if let Some(notice) = &state.notice {
        return notice.clone();
    }

    match state.speech.state() {
        EngineState::Uninitialized | EngineState::Initializing => {
            "Starting speech engine...".to_string()
        }
        EngineState::Failed(_) => "Speech unavailable".to_string(),
        EngineState::ShutDown => "Speech stopped".to_string(),
        EngineState::Ready => format!(
            "Voice: {}",
            state.voice_title.as_deref().unwrap_or("default")
        ),
    }
}

fn help_line(state: &State) -> String {
    if state.dialog.is_some() {
        return "[1-9/Up/Down] Listen   [Enter] Use   [Esc] Cancel".to_string();
    }

    let mut help = Vec::new();
    if state.voice_settings_available() {
        help.push("[alt+v] Voices");
    }
    help.push("[alt+x] Silence");
    help.push("[alt+q] Quit");
    help.join("   ")
}
