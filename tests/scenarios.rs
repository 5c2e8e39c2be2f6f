use std::cell::RefCell;
use std::rc::Rc;

use futures_util::future::{self, FutureExt};
use pretty_assertions::assert_eq;

use input_emoji::{
    Component, InputEmoji, InputEmojiOptions, InputEvent, KeyInput, MentionUser, Node,
    Placeholder, Size,
};

fn type_text(widget: &mut InputEmoji, text: &str) {
    for ch in text.chars() {
        widget.handle_event(InputEvent::Key(KeyInput::character(ch.to_string())));
    }
}

fn press(widget: &mut InputEmoji, id: &str) {
    widget.handle_event(InputEvent::key(id).expect("valid key id"));
}

/// Widget whose search returns `users` immediately and records every query.
fn with_search(users: Vec<MentionUser>) -> (InputEmoji, Rc<RefCell<Vec<String>>>) {
    let mut widget = InputEmoji::default();
    let queries = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&queries);
    widget.set_search_mention(move |query| {
        seen.borrow_mut().push(query.to_string());
        future::ready(Ok(users.clone())).boxed_local()
    });
    widget.focus();
    (widget, queries)
}

#[test]
fn typing_a_mention_and_pressing_enter_commits_the_token() {
    let (mut widget, queries) = with_search(vec![MentionUser::new("1", "Stacey Fleming")]);
    let sent = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&sent);
    widget.set_on_enter(move |value| sink.borrow_mut().push(value));

    type_text(&mut widget, "Hi @");
    type_text(&mut widget, "s");
    assert_eq!(queries.borrow().last().map(String::as_str), Some("@s"));

    press(&mut widget, "enter");

    let content = widget.content().expect("mounted");
    assert_eq!(content.nodes()[0], Node::Text("Hi ".into()));
    let Node::Placeholder(Placeholder::Mention { token }) = &content.nodes()[1] else {
        panic!("mention placeholder expected, got {:?}", content.nodes());
    };
    assert_eq!(token.label(), "@Stacey Fleming");
    assert_eq!(widget.value(), "Hi @[Stacey Fleming](userId:1) ");
    assert!(sent.borrow().is_empty(), "enter committed the mention, not the message");
}

#[test]
fn set_value_keeps_emoji_through_one_round_trip() {
    let mut widget = InputEmoji::default();
    widget.set_value("😀 hi");
    assert_eq!(widget.value(), "😀 hi");
    assert!(widget.render_html().starts_with("<span class=\"react-input-emoji--emoji\""));
}

#[test]
fn max_length_boundary() {
    let mut widget = InputEmoji::new(InputEmojiOptions {
        max_length: Some(3),
        ..InputEmojiOptions::default()
    });
    widget.focus();

    type_text(&mut widget, "ab");
    type_text(&mut widget, "c");
    assert_eq!(widget.value(), "abc");

    type_text(&mut widget, "d");
    assert_eq!(widget.value(), "abc");

    press(&mut widget, "backspace");
    assert_eq!(widget.value(), "ab");
}

#[test]
fn at_sign_triggers_only_at_a_word_start() {
    let (mut widget, queries) = with_search(vec![MentionUser::new("1", "Sam")]);
    type_text(&mut widget, "@");
    assert_eq!(*queries.borrow(), vec!["@".to_string()]);
    assert_eq!(widget.mention_state().query.as_deref(), Some("@"));

    let (mut glued, glued_queries) = with_search(vec![MentionUser::new("1", "Sam")]);
    type_text(&mut glued, "mail@");
    assert!(glued_queries.borrow().is_empty());
    assert_eq!(glued.mention_state().query, None);
}

#[test]
fn arrow_navigation_clamps_at_both_ends() {
    let (mut widget, _) = with_search(vec![
        MentionUser::new("1", "Ann"),
        MentionUser::new("2", "Abe"),
        MentionUser::new("3", "Amy"),
    ]);
    type_text(&mut widget, "@a");
    assert_eq!(widget.mention_state().candidates.len(), 3);

    for _ in 0..5 {
        press(&mut widget, "down");
    }
    assert_eq!(widget.mention_state().selected_index, 2);

    for _ in 0..5 {
        press(&mut widget, "up");
    }
    assert_eq!(widget.mention_state().selected_index, 0);
    press(&mut widget, "up");
    assert_eq!(widget.mention_state().selected_index, 0);
    assert_eq!(widget.value(), "@a");
}

#[test]
fn clicking_a_candidate_commits_it() {
    let (mut widget, _) = with_search(vec![
        MentionUser::new("1", "Ann"),
        MentionUser::new("2", "Abe"),
    ]);
    type_text(&mut widget, "hey @a");
    widget.hover_mention(1);
    assert_eq!(
        widget.mention_list().get_selected_item().map(|item| item.user.id.as_str()),
        Some("2")
    );
    assert!(widget.select_mention(1));
    assert_eq!(widget.value(), "hey @[Abe](userId:2) ");
}

#[test]
fn identical_layouts_report_resize_once() {
    let mut widget = InputEmoji::default();
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sizes);
    widget.set_on_resize(move |size| sink.borrow_mut().push(size));
    widget.focus();

    type_text(&mut widget, "a");
    press(&mut widget, "left");
    press(&mut widget, "right");
    assert_eq!(*sizes.borrow(), vec![Size::new(1, 1)]);

    type_text(&mut widget, "b");
    assert_eq!(*sizes.borrow(), vec![Size::new(1, 1), Size::new(2, 1)]);
}

#[test]
fn key_down_listener_can_suppress_typing() {
    let mut widget = InputEmoji::default();
    widget.set_on_key_down(|event| {
        if event
            .key_input()
            .is_some_and(|key| key.key == input_emoji::Key::Character("#".into()))
        {
            event.prevent_default();
        }
    });
    widget.focus();
    type_text(&mut widget, "a#b");
    assert_eq!(widget.value(), "ab");
}
