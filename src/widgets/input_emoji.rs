//! InputEmoji widget: a chat input with inline emoji, @mentions and a controlled value.
//!
//! Features are independent router listeners over a shared [`EditorContext`]: mention commit and
//! enter-to-send on `Enter`, list navigation on the arrow channels, mention detection and change
//! emission on `KeyUp`. A keystroke is published as Enter/Arrow (when it is one), then `KeyDown`;
//! the surface's built-in action runs unless a listener prevented it; then `KeyUp`.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use futures_util::future::LocalBoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};

use crate::config::EnvConfig;
use crate::core::codec::{Codec, CodecConfig};
use crate::core::component::{Component, Focusable};
use crate::core::editor_component::EditorComponent;
use crate::core::emoji::{BuiltinCatalog, EmojiCatalog};
use crate::core::event_router::{Channel, EventRouter, Subscription, SurfaceEvent};
use crate::core::html::render_html;
use crate::core::input_event::{InputEvent, Key, KeyInput};
use crate::core::markup::{Markup, Placeholder};
use crate::core::mention::{MentionToken, MentionUser};
use crate::core::surface::{MemorySurface, Size, Surface};
use crate::runtime::emit::EmitCoordinator;
use crate::runtime::mention_resolver::{
    MentionResolver, MentionSearchState, SearchMention, SearchResult,
};
use crate::runtime::surface_controller::{CaretMotion, SurfaceController};
use crate::widgets::emoji_picker::{EmojiPickerState, PickedEmoji};
use crate::widgets::mention_list::MentionList;

pub const DEFAULT_PLACEHOLDER: &str = "Type a message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEmojiOptions {
    /// Label shown while the content is empty.
    pub placeholder: String,
    /// Insertion limit, counted as text chars + one per emoji + mention label chars + one per
    /// line break.
    pub max_length: Option<usize>,
    /// Clear the content after Enter sends it.
    pub clean_on_enter: bool,
    /// Shift+Enter inserts a line break and line breaks survive in the value.
    pub should_return: bool,
    /// Keep the picker open after an emoji is picked.
    pub keep_opened: bool,
    /// Hide the picker's "recent" category.
    pub disable_recent: bool,
    /// The host supplies its own picker trigger instead of the built-in button.
    pub custom_button: bool,
    /// Trailing-edge window for resize notifications.
    pub resize_debounce: Option<Duration>,
}

impl Default for InputEmojiOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_length: None,
            clean_on_enter: false,
            should_return: false,
            keep_opened: false,
            disable_recent: false,
            custom_button: false,
            resize_debounce: None,
        }
    }
}

impl InputEmojiOptions {
    /// Defaults with environment overrides applied.
    pub fn from_env(config: &EnvConfig) -> Self {
        Self {
            resize_debounce: config.resize_debounce_ms.map(Duration::from_millis),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct Callbacks {
    on_change: Option<Box<dyn FnMut(String)>>,
    on_enter: Option<Box<dyn FnMut(String)>>,
    on_resize: Option<Box<dyn FnMut(Size)>>,
    on_focus: Option<Box<dyn FnMut()>>,
    on_click: Option<Box<dyn FnMut()>>,
    on_blur: Option<Box<dyn FnMut()>>,
    on_key_down: Option<Box<dyn FnMut(&SurfaceEvent)>>,
}

type InFlight = FuturesUnordered<LocalBoxFuture<'static, (u64, SearchResult)>>;

/// State shared by every feature listener.
pub struct EditorContext<S: Surface> {
    controller: SurfaceController<S>,
    resolver: MentionResolver,
    picker: EmojiPickerState,
    emitter: EmitCoordinator,
    callbacks: Callbacks,
    options: InputEmojiOptions,
    search_mention: Option<SearchMention>,
    in_flight: InFlight,
}

impl<S: Surface> EditorContext<S> {
    pub fn value(&self) -> String {
        self.controller.get_value()
    }

    pub fn controller(&self) -> &SurfaceController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SurfaceController<S> {
        &mut self.controller
    }

    pub fn options(&self) -> &InputEmojiOptions {
        &self.options
    }

    pub fn mention_state(&self) -> MentionSearchState {
        self.resolver.state()
    }

    pub fn is_mention_list_active(&self) -> bool {
        self.resolver.is_list_active()
    }

    pub fn picker(&self) -> &EmojiPickerState {
        &self.picker
    }

    /// Whether one more unit may be inserted under `max_length`.
    fn can_insert(&self) -> bool {
        match self.options.max_length {
            Some(max) => self.controller.character_count() < max,
            None => true,
        }
    }

    fn remaining_capacity(&self) -> Option<usize> {
        self.options
            .max_length
            .map(|max| max.saturating_sub(self.controller.character_count()))
    }

    /// Encode `text` and insert it, truncated to the remaining capacity.
    fn insert_text(&mut self, text: &str) -> bool {
        let mut fragment = self.controller.codec().encode(text);
        if let Some(remaining) = self.remaining_capacity() {
            if remaining == 0 {
                log::debug!("insertion rejected: max length reached");
                return false;
            }
            fragment = fragment.take_characters(remaining);
        }
        if fragment.is_empty() {
            return false;
        }
        self.controller.insert_fragment(fragment)
    }

    fn insert_line_break(&mut self) -> bool {
        if !self.can_insert() {
            log::debug!("line break rejected: max length reached");
            return false;
        }
        self.controller.insert_line_break()
    }

    /// Decode and notify change and resize, each only when it differs from the last notified.
    fn emit(&mut self) {
        let value = self.controller.get_value();
        if let Some(value) = self.emitter.emit_change(value) {
            if let Some(on_change) = self.callbacks.on_change.as_mut() {
                on_change(value);
            }
        }
        self.check_resize(Instant::now());
    }

    fn check_resize(&mut self, now: Instant) {
        let Some(size) = self.controller.measure() else {
            return;
        };
        if let Some(size) = self.emitter.check_resize(size, now) {
            self.deliver_resize(size);
        }
    }

    fn deliver_resize(&mut self, size: Size) {
        log::trace!("resize {}x{}", size.width, size.height);
        if let Some(on_resize) = self.callbacks.on_resize.as_mut() {
            on_resize(size);
        }
    }

    /// Send the current value: change, then `on_enter`, then clear when configured.
    fn send(&mut self) {
        let value = self.controller.get_value();
        self.emit();
        if let Some(on_enter) = self.callbacks.on_enter.as_mut() {
            on_enter(value);
        }
        if self.options.clean_on_enter {
            self.controller.clear();
            self.resolver.reset();
            self.emit();
        }
    }

    /// Re-run mention detection against the text left of the caret and start a search when the
    /// query is new.
    fn check_mention(&mut self) {
        let Some(search) = self.search_mention.clone() else {
            return;
        };
        let text = self.controller.text_before_caret().map(|(_, text)| text);
        if let Some(request) = self.resolver.update(text.as_deref()) {
            let seq = request.seq;
            let search = search(&request.query);
            self.in_flight
                .push(async move { (seq, search.await) }.boxed_local());
        }
    }

    /// Replace the "@query" left of the caret with a mention of `user` and a trailing space.
    fn commit_mention(&mut self, user: MentionUser) {
        self.controller.delete_mention_query();
        let mut fragment = Markup::placeholder(Placeholder::mention(MentionToken::for_user(&user)));
        fragment.push_text(" ");
        if !self.controller.append_at_caret(fragment) {
            log::debug!("mention for {:?} dropped: no caret context", user.name);
        }
        self.resolver.reset();
        self.emit();
    }

    fn commit_selected_mention(&mut self) -> bool {
        match self.resolver.selected_candidate().cloned() {
            Some(user) => {
                self.commit_mention(user);
                true
            }
            None => false,
        }
    }

    fn apply_default_action(&mut self, input: &KeyInput) {
        let modifiers = input.modifiers;
        match &input.key {
            Key::Character(text) if modifiers.command() => {
                if text.eq_ignore_ascii_case("a") {
                    self.controller.select_all();
                }
            }
            Key::Character(text) => {
                self.insert_text(text);
            }
            Key::Enter => {
                if self.options.should_return {
                    self.insert_line_break();
                }
            }
            Key::Backspace => {
                self.controller.delete_backward();
            }
            Key::Delete => {
                self.controller.delete_forward();
            }
            Key::ArrowLeft => {
                self.controller.move_caret(CaretMotion::Left, modifiers.shift);
            }
            Key::ArrowRight => {
                self.controller
                    .move_caret(CaretMotion::Right, modifiers.shift);
            }
            Key::Home => {
                self.controller
                    .move_caret(CaretMotion::LineStart, modifiers.shift);
            }
            Key::End => {
                self.controller
                    .move_caret(CaretMotion::LineEnd, modifiers.shift);
            }
            // Vertical moves depend on host layout; the host reports the result as a
            // selection change.
            Key::ArrowUp | Key::ArrowDown | Key::Escape | Key::Tab => {}
        }
    }
}

fn install_listeners<S: Surface + 'static>(
    router: &EventRouter<EditorContext<S>>,
) -> Vec<Subscription> {
    vec![
        // Mention commit has to run before enter-to-send.
        router.subscribe(Channel::Enter, |event, cx| {
            if cx.resolver.is_list_active() {
                event.prevent_default();
                event.stop_propagation();
                cx.commit_selected_mention();
            }
        }),
        router.subscribe(Channel::Enter, |event, cx| {
            if event.default_prevented() {
                return;
            }
            event.prevent_default();
            let shift = event.key_input().is_some_and(|key| key.modifiers.shift);
            if shift && cx.options.should_return {
                cx.insert_line_break();
            } else {
                cx.send();
            }
        }),
        router.subscribe(Channel::ArrowUp, |event, cx| {
            if cx.resolver.is_list_active() {
                event.prevent_default();
                cx.resolver.select_previous();
            }
        }),
        router.subscribe(Channel::ArrowDown, |event, cx| {
            if cx.resolver.is_list_active() {
                event.prevent_default();
                cx.resolver.select_next();
            }
        }),
        router.subscribe(Channel::KeyDown, |event, cx| {
            let escape = event.key_input().is_some_and(|key| key.key == Key::Escape);
            if escape && cx.resolver.query().is_some() {
                cx.resolver.reset();
            }
        }),
        router.subscribe(Channel::KeyUp, |event, cx| {
            let skip = event.key_input().is_some_and(|key| {
                matches!(key.key, Key::ArrowUp | Key::ArrowDown | Key::Escape)
            });
            if !skip {
                cx.check_mention();
            }
        }),
        router.subscribe(Channel::KeyUp, |_, cx| cx.emit()),
        router.subscribe(Channel::Focus, |_, cx| cx.check_mention()),
    ]
}

pub struct InputEmoji<S: Surface + 'static = MemorySurface> {
    router: EventRouter<EditorContext<S>>,
    cx: EditorContext<S>,
    subscriptions: Vec<Subscription>,
}

impl InputEmoji<MemorySurface> {
    pub fn new(options: InputEmojiOptions) -> Self {
        Self::with_surface(MemorySurface::new(), options)
    }
}

impl Default for InputEmoji<MemorySurface> {
    fn default() -> Self {
        Self::new(InputEmojiOptions::default())
    }
}

impl<S: Surface + 'static> InputEmoji<S> {
    pub fn with_surface(surface: S, options: InputEmojiOptions) -> Self {
        let codec = Codec::new(
            CodecConfig {
                preserve_line_breaks: options.should_return,
                parse_mentions: true,
            },
            Rc::new(BuiltinCatalog),
        );
        let mut controller = SurfaceController::new(codec);
        controller.mount(surface);

        let emitter = options
            .resize_debounce
            .map(EmitCoordinator::with_resize_debounce)
            .unwrap_or_default();

        let router = EventRouter::new();
        let subscriptions = install_listeners(&router);
        Self {
            router,
            cx: EditorContext {
                controller,
                resolver: MentionResolver::new(),
                picker: EmojiPickerState::new(options.keep_opened, options.disable_recent),
                emitter,
                callbacks: Callbacks::default(),
                options,
                search_mention: None,
                in_flight: FuturesUnordered::new(),
            },
            subscriptions,
        }
    }

    /// Style emoji from `catalog` instead of the built-in table.
    pub fn with_catalog(mut self, catalog: Rc<dyn EmojiCatalog>) -> Self {
        self.cx.controller.codec_mut().set_catalog(catalog);
        self
    }

    pub fn options(&self) -> &InputEmojiOptions {
        &self.cx.options
    }

    pub fn placeholder(&self) -> &str {
        &self.cx.options.placeholder
    }

    pub fn context(&self) -> &EditorContext<S> {
        &self.cx
    }

    pub fn surface(&self) -> Option<&S> {
        self.cx.controller.surface()
    }

    pub fn content(&self) -> Option<&Markup> {
        self.cx.controller.content()
    }

    pub fn set_on_change(&mut self, handler: impl FnMut(String) + 'static) {
        self.cx.callbacks.on_change = Some(Box::new(handler));
    }

    pub fn set_on_enter(&mut self, handler: impl FnMut(String) + 'static) {
        self.cx.callbacks.on_enter = Some(Box::new(handler));
    }

    pub fn set_on_resize(&mut self, handler: impl FnMut(Size) + 'static) {
        self.cx.callbacks.on_resize = Some(Box::new(handler));
    }

    pub fn set_on_focus(&mut self, handler: impl FnMut() + 'static) {
        self.cx.callbacks.on_focus = Some(Box::new(handler));
    }

    pub fn set_on_click(&mut self, handler: impl FnMut() + 'static) {
        self.cx.callbacks.on_click = Some(Box::new(handler));
    }

    pub fn set_on_blur(&mut self, handler: impl FnMut() + 'static) {
        self.cx.callbacks.on_blur = Some(Box::new(handler));
    }

    /// Called for every keydown after the feature listeners; may call `prevent_default`.
    pub fn set_on_key_down(&mut self, handler: impl FnMut(&SurfaceEvent) + 'static) {
        self.cx.callbacks.on_key_down = Some(Box::new(handler));
    }

    /// Enable mentions. Without a search function "@" never triggers anything.
    pub fn set_search_mention<F>(&mut self, search: F)
    where
        F: Fn(&str) -> LocalBoxFuture<'static, SearchResult> + 'static,
    {
        let search: SearchMention = Rc::new(search);
        self.cx.search_mention = Some(search);
    }

    pub fn clear_search_mention(&mut self) {
        self.cx.search_mention = None;
        self.cx.resolver.reset();
    }

    /// Subscribe an additional listener to a router channel.
    pub fn add_event_listener<F>(&self, channel: Channel, listener: F) -> Subscription
    where
        F: FnMut(&SurfaceEvent, &mut EditorContext<S>) + 'static,
    {
        self.router.subscribe(channel, listener)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(input) => self.handle_key(input),
            InputEvent::Paste { text } => {
                self.paste(&text);
            }
            InputEvent::Focus => self.focus(),
            InputEvent::Blur => self.blur(),
            InputEvent::Click => {
                if let Some(on_click) = self.cx.callbacks.on_click.as_mut() {
                    on_click();
                }
            }
            InputEvent::ClickOutside => self.cx.picker.close(),
            InputEvent::SelectionChange(selection) => {
                self.cx.controller.on_selection_change(selection)
            }
        }
    }

    fn handle_key(&mut self, input: KeyInput) {
        self.cx.controller.capture_selection();

        let event = SurfaceEvent::key(input.clone());
        let channel = match input.key {
            Key::Enter => Some(Channel::Enter),
            Key::ArrowUp => Some(Channel::ArrowUp),
            Key::ArrowDown => Some(Channel::ArrowDown),
            _ => None,
        };
        if let Some(channel) = channel {
            self.router.publish(channel, &event, &mut self.cx);
        }

        let key_down = event.continued();
        self.router
            .publish(Channel::KeyDown, &key_down, &mut self.cx);
        if let Some(on_key_down) = self.cx.callbacks.on_key_down.as_mut() {
            on_key_down(&key_down);
        }

        if !key_down.default_prevented() {
            self.cx.apply_default_action(&input);
        }

        let key_up = SurfaceEvent::key(input);
        self.router.publish(Channel::KeyUp, &key_up, &mut self.cx);
        self.pump_mentions();
    }

    /// Insert plain clipboard text at the caret, truncated to the remaining capacity.
    ///
    /// Line breaks become spaces unless `should_return` is set.
    pub fn paste(&mut self, text: &str) -> bool {
        let inserted = self.cx.insert_text(text);
        if inserted {
            self.cx.emit();
        }
        inserted
    }

    /// Plain text of the current selection: emoji as themselves, mentions as their label.
    pub fn copy_selection(&self) -> Option<String> {
        self.cx
            .controller
            .selected_markup()
            .map(|markup| markup.plain_text())
    }

    pub fn toggle_picker(&mut self) {
        self.cx.picker.toggle();
    }

    pub fn picker(&self) -> &EmojiPickerState {
        &self.cx.picker
    }

    /// Insert a picked emoji at the cached caret.
    pub fn select_emoji(&mut self, emoji: PickedEmoji) -> bool {
        if !self.cx.can_insert() {
            log::debug!("emoji rejected: max length reached");
            return false;
        }
        let inserted = self
            .cx
            .controller
            .append_at_caret(Markup::placeholder(emoji.placeholder()));
        if inserted {
            self.cx.emit();
        }
        self.cx.picker.picked();
        inserted
    }

    pub fn mention_state(&self) -> MentionSearchState {
        self.cx.resolver.state()
    }

    pub fn mention_list(&self) -> MentionList {
        MentionList::from_state(&self.cx.resolver.state())
    }

    pub fn hover_mention(&mut self, index: usize) {
        self.cx.resolver.set_selected_index(index);
    }

    /// Commit the candidate at `index` (clamped), as a click on the list would.
    pub fn select_mention(&mut self, index: usize) -> bool {
        self.cx.resolver.set_selected_index(index);
        self.cx.commit_selected_mention()
    }

    /// Apply every mention search that has already finished. Never blocks.
    pub fn pump_mentions(&mut self) -> usize {
        let mut applied = 0;
        while let Some(Some((seq, result))) = self.cx.in_flight.next().now_or_never() {
            if self.cx.resolver.complete(seq, result) {
                applied += 1;
            }
        }
        applied
    }

    /// Drive every in-flight mention search to completion.
    pub async fn settle_mentions(&mut self) {
        while let Some((seq, result)) = self.cx.in_flight.next().await {
            self.cx.resolver.complete(seq, result);
        }
    }

    pub fn value(&self) -> String {
        self.cx.controller.get_value()
    }

    /// Controlled value update. A value equal to the current one is ignored.
    pub fn set_value(&mut self, value: &str) {
        if self.value() == value {
            return;
        }
        self.cx.controller.set_value(value);
        self.cx.resolver.reset();
        let current = self.value();
        self.cx.emitter.sync_value(&current);
        self.cx.check_resize(Instant::now());
    }

    pub fn focus(&mut self) {
        self.cx.controller.focus();
        if let Some(on_focus) = self.cx.callbacks.on_focus.as_mut() {
            on_focus();
        }
        self.router
            .publish(Channel::Focus, &SurfaceEvent::bare(), &mut self.cx);
        self.pump_mentions();
    }

    pub fn blur(&mut self) {
        self.cx.controller.blur();
        self.router
            .publish(Channel::Blur, &SurfaceEvent::bare(), &mut self.cx);
        self.cx.emit();
        if let Some(on_blur) = self.cx.callbacks.on_blur.as_mut() {
            on_blur();
        }
    }

    pub fn has_focus(&self) -> bool {
        self.cx.controller.has_focus()
    }

    /// Advance time: fire a due debounced resize and apply finished mention searches.
    pub fn tick(&mut self, now: Instant) {
        if let Some(size) = self.cx.emitter.poll_resize(now) {
            self.cx.deliver_resize(size);
        }
        self.pump_mentions();
    }

    /// Earliest instant at which [`InputEmoji::tick`] has work to do, if a notification is pending.
    pub fn next_tick_deadline(&self) -> Option<Instant> {
        self.cx.emitter.resize_deadline()
    }

    /// Tear down: pending notifications and searches are dropped and listeners removed.
    pub fn unmount(&mut self) -> Option<S> {
        self.cx.emitter.cancel();
        self.cx.resolver.reset();
        self.cx.in_flight = FuturesUnordered::new();
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.cx.controller.unmount()
    }
}

impl<S: Surface + 'static> Component for InputEmoji<S> {
    fn render_html(&self) -> String {
        self.content().map(render_html).unwrap_or_default()
    }

    fn handle_event(&mut self, event: &InputEvent) {
        InputEmoji::handle_event(self, event.clone());
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl<S: Surface + 'static> Focusable for InputEmoji<S> {
    fn set_focused(&mut self, focused: bool) {
        if focused {
            self.focus();
        } else {
            self.blur();
        }
    }

    fn is_focused(&self) -> bool {
        self.has_focus()
    }
}

impl<S: Surface + 'static> EditorComponent for InputEmoji<S> {
    fn get_text(&self) -> String {
        self.value()
    }

    fn set_text(&mut self, text: &str) {
        self.set_value(text);
    }

    fn set_on_submit(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.cx.callbacks.on_enter = handler;
    }

    fn set_on_change(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.cx.callbacks.on_change = handler;
    }

    fn insert_text_at_cursor(&mut self, text: &str) {
        if self.cx.insert_text(text) {
            self.cx.emit();
        }
    }
}

impl<S: Surface + 'static> fmt::Debug for InputEmoji<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputEmoji")
            .field("value", &self.value())
            .field("options", &self.cx.options)
            .field("mention", &self.cx.resolver.phase())
            .field("picker_open", &self.cx.picker.is_open())
            .field("router", &self.router)
            .finish()
    }
}
