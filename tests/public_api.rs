#![allow(unused_imports)]

use input_emoji::{
    decode, decode_html, encode, is_focusable, parse_html, render_html, visible_width,
    BuiltinCatalog, CaretMotion, Channel, Codec, CodecConfig, Component, EditorComponent,
    EditorContext, EmitCoordinator, EmojiCatalog, EmojiPickerState, EmojiStyle, EnvConfig,
    EventRouter, Focusable, InputEmoji, InputEmojiOptions, InputEvent, Key, KeyInput,
    LoggingError, Markup, MemorySurface, MentionItem, MentionList, MentionResolver,
    MentionSearchError, MentionSearchState, MentionToken, MentionUser, Modifiers, NativeCatalog,
    Node, PickedEmoji, Placeholder, SelectionState, Size, Subscription, Surface,
    SurfaceController, SurfaceEvent,
};

#[test]
fn public_api_exports_compile() {}

#[test]
fn input_emoji_is_focusable() {
    let mut widget = InputEmoji::default();
    assert!(is_focusable(&mut widget));
    widget.set_focused(true);
    assert!(widget.is_focused());
}

#[test]
fn editor_component_contract_round_trips_text() {
    let mut widget = InputEmoji::default();
    EditorComponent::set_text(&mut widget, "hey 👋");
    assert_eq!(widget.get_text(), "hey 👋");
    assert!(widget.render_html().contains("data-emoji=\"👋\""));
}
