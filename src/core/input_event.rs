//! Structured input events delivered to the input widget.

use crate::core::selection::SelectionState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character (or cluster) the key produces.
    Character(String),
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Escape,
    Tab,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name. Single printable values become `Character`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Space" | "Spacebar" => Key::Character(" ".to_string()),
            other if !other.is_empty() && !other.chars().any(char::is_control) => {
                // Named non-printing keys ("Shift", "F5") are longer than one grapheme.
                if crate::core::text::utils::grapheme_segments(other).count() == 1 {
                    Key::Character(other.to_string())
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        Some(key)
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Key::Character(_))
    }

    /// Keys that move through the mention list or the text without editing it.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight | Key::Home | Key::End
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn character(text: impl Into<String>) -> Self {
        Self::plain(Key::Character(text.into()))
    }

    /// Parse a key id such as `"enter"`, `"shift+enter"`, `"ctrl+a"`, `"up"` or `"@"`.
    pub fn parse(id: &str) -> Option<Self> {
        let mut modifiers = Modifiers::NONE;
        let mut parts: Vec<&str> = id.split('+').collect();
        // A bare "+" (or "shift++") names the plus key itself.
        if id.ends_with("++") || id == "+" {
            parts.retain(|part| !part.is_empty());
            parts.push("+");
        }
        let key_name = parts.pop()?;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => return None,
            }
        }
        let key = match key_name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "delete" => Key::Delete,
            "up" => Key::ArrowUp,
            "down" => Key::ArrowDown,
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            "home" => Key::Home,
            "end" => Key::End,
            "escape" | "esc" => Key::Escape,
            "tab" => Key::Tab,
            "space" => Key::Character(" ".to_string()),
            _ => Key::from_name(key_name)?,
        };
        Some(Self { key, modifiers })
    }
}

/// Input event delivered to the widget by its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    /// Plain-text clipboard content.
    Paste {
        text: String,
    },
    Focus,
    Blur,
    Click,
    /// A pointer press outside the widget (closes the picker).
    ClickOutside,
    /// The host's live selection moved.
    SelectionChange(SelectionState),
}

impl InputEvent {
    pub fn key(id: &str) -> Option<Self> {
        KeyInput::parse(id).map(InputEvent::Key)
    }

    pub fn paste(text: impl Into<String>) -> Self {
        InputEvent::Paste { text: text.into() }
    }
}
