//! Headless rich-text chat input with inline emoji, @mentions and a controlled plain-text value.
//!
//! Invariant: the plain-text value is always `decode(content)`; every mutation goes through the
//! surface controller, which re-encodes and restores the caret.
//!
//! # Public API Overview
//! - Drive [`InputEmoji`] with [`InputEvent`]s from a host and read its value back.
//! - Convert between values and [`Markup`] with [`Codec`], and between markup and HTML with
//!   [`render_html`] / [`parse_html`].
//! - Hook features onto keystrokes through [`EventRouter`] channels.
//! - Plug a host editing surface in via the [`Surface`] trait ([`MemorySurface`] is built in).

#![allow(clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod runtime;
pub mod widgets;

/// Built-in widgets.
pub use crate::widgets::{
    EditorContext, EmojiPickerState, InputEmoji, InputEmojiOptions, MentionItem, MentionList,
    PickedEmoji,
};

/// Editor component behavior contract.
pub use crate::core::editor_component::EditorComponent;

/// Content model and value codec.
pub use crate::core::codec::{decode, encode, Codec, CodecConfig};
pub use crate::core::markup::{Markup, Node, Placeholder};
pub use crate::core::selection::SelectionState;

/// Emoji and mention primitives.
pub use crate::core::emoji::{BuiltinCatalog, EmojiCatalog, EmojiStyle, NativeCatalog};
pub use crate::core::mention::{MentionToken, MentionUser};

/// HTML conversion for contenteditable hosts.
pub use crate::core::html::{decode_html, parse_html, render_html};

/// Input events and key parsing.
pub use crate::core::input_event::{InputEvent, Key, KeyInput, Modifiers};

/// Event routing between features.
pub use crate::core::event_router::{Channel, EventRouter, Subscription, SurfaceEvent};

/// Host surface abstraction.
pub use crate::core::surface::{MemorySurface, Size, Surface};

/// Runtime component traits.
pub use crate::core::component::{Component, Focusable};

/// Runtime coordination types.
pub use crate::runtime::{
    CaretMotion, EmitCoordinator, MentionResolver, MentionSearchState, SurfaceController,
};

/// Configuration, logging and errors.
pub use crate::config::EnvConfig;
pub use crate::error::{LoggingError, MentionSearchError};

/// Returns whether a component exposes focus behavior via [`Focusable`].
pub fn is_focusable(component: &mut dyn Component) -> bool {
    component.as_focusable().is_some()
}

/// Terminal-style display width of a string (emoji count as two columns).
pub use crate::core::text::width::visible_width;
