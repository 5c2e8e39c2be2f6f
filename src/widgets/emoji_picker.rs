//! Emoji picker state. The picker UI itself is external; this tracks whether it is showing and
//! turns a picked emoji into a placeholder.

use crate::core::emoji::{lookup, EmojiStyle};
use crate::core::markup::Placeholder;

/// What an external picker hands back for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedEmoji {
    pub native: String,
    pub name: String,
    /// Inline style (sprite background) for the image placeholder, if the picker renders one.
    pub style: Option<String>,
}

impl PickedEmoji {
    pub fn native(native: impl Into<String>) -> Self {
        let native = native.into();
        let name = lookup(&native)
            .map(|emoji| emoji.name().to_string())
            .unwrap_or_else(|| native.clone());
        Self {
            native,
            name,
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn placeholder(&self) -> Placeholder {
        let style = EmojiStyle {
            name: self.name.clone(),
            css: self.style.as_ref().map(|css| css.replace('"', "'")),
        };
        Placeholder::emoji(self.native.clone(), style)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiPickerState {
    open: bool,
    keep_opened: bool,
    disable_recent: bool,
}

impl EmojiPickerState {
    pub fn new(keep_opened: bool, disable_recent: bool) -> Self {
        Self {
            open: false,
            keep_opened,
            disable_recent,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// After a pick the picker closes unless configured to stay open.
    pub fn picked(&mut self) {
        if !self.keep_opened {
            self.open = false;
        }
    }

    /// Categories the picker should hide.
    pub fn excluded_categories(&self) -> Vec<&'static str> {
        if self.disable_recent {
            vec!["recent"]
        } else {
            Vec::new()
        }
    }
}
