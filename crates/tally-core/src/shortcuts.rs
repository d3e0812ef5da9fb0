//! Keyboard shortcut binder
//!
//! Maps physical key events from the host frame to counter operations.
//! Events originating from text-input controls are ignored so typing in a
//! form never mutates the counter.

use serde::{Deserialize, Serialize};

use crate::CounterStore;

/// Help text shown for the `?` binding
pub const SHORTCUT_HELP: &str =
    "Keyboard shortcuts:\n↑/+ Increment\n↓/- Decrement\nCtrl+R Reset\nCtrl+Z Undo";

/// A physical key event as reported by the host frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// Key value, e.g. "ArrowUp", "+", "z"
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    /// True when the event target is a text-input control
    #[serde(default)]
    pub from_text_input: bool,
}

/// Operation a key event resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutIntent {
    Increment,
    Decrement,
    Reset,
    Undo,
    /// Display the shortcut help; no state effect
    Help,
}

/// Resolve a key event to an intent. Unbound keys and events from
/// text-input controls resolve to `None`.
pub fn resolve_shortcut(event: &KeyEvent) -> Option<ShortcutIntent> {
    if event.from_text_input {
        return None;
    }

    let modified = event.ctrl || event.meta;

    match event.key.as_str() {
        "ArrowUp" | "+" => Some(ShortcutIntent::Increment),
        "ArrowDown" | "-" => Some(ShortcutIntent::Decrement),
        "r" | "R" if modified => Some(ShortcutIntent::Reset),
        "z" | "Z" if modified => Some(ShortcutIntent::Undo),
        "?" => Some(ShortcutIntent::Help),
        _ => None,
    }
}

/// Resolve a key event and apply it to the store.
/// Returns the resolved intent, if any.
pub fn apply_shortcut(store: &mut CounterStore, event: &KeyEvent) -> Option<ShortcutIntent> {
    let intent = resolve_shortcut(event)?;

    match intent {
        ShortcutIntent::Increment => store.increment(),
        ShortcutIntent::Decrement => store.decrement(),
        ShortcutIntent::Reset => store.reset(),
        ShortcutIntent::Undo => store.undo(),
        ShortcutIntent::Help => {}
    }

    Some(intent)
}
