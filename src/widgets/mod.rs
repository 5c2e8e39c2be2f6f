//! Widgets built on the runtime.

pub mod emoji_picker;
pub mod input_emoji;
pub mod mention_list;

pub use emoji_picker::{EmojiPickerState, PickedEmoji};
pub use input_emoji::{EditorContext, InputEmoji, InputEmojiOptions, DEFAULT_PLACEHOLDER};
pub use mention_list::{highlight_name, MentionItem, MentionList, NameSegment};
