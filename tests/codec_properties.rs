use pretty_assertions::assert_eq;

use input_emoji::{decode, encode, parse_html, render_html, BuiltinCatalog, CodecConfig};

const VALUES: &[&str] = &[
    "",
    "plain words",
    "😀 hi",
    "👍🏽 tone and 👨‍👩‍👧 family",
    "flags 🇯🇵🇫🇷 side by side",
    "keycap 1️⃣ and heart ❤️",
    "@[Stacey Fleming](userId:1) hello",
    "cc @[Bo](userId:2)@[Al](userId:3)",
    "mail me at a@b.com",
    "broken @[name](userId:1 token",
    "@[unclosed",
    "© and ™ stay text",
    "  spaced  out  ",
    "a\nb",
    "x\r\ny",
];

fn collapse_line_breaks(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[test]
fn decode_inverts_encode() {
    let config = CodecConfig::default();
    for value in VALUES {
        let markup = encode(value, &config, &BuiltinCatalog);
        assert_eq!(
            decode(&markup, &config),
            collapse_line_breaks(value),
            "value {value:?}"
        );
    }
}

#[test]
fn encode_is_idempotent() {
    let config = CodecConfig::default();
    for value in VALUES {
        let once = encode(value, &config, &BuiltinCatalog);
        let twice = encode(&decode(&once, &config), &config, &BuiltinCatalog);
        assert_eq!(twice, once, "value {value:?}");
    }
}

#[test]
fn line_breaks_survive_when_preserved() {
    let config = CodecConfig {
        preserve_line_breaks: true,
        ..CodecConfig::default()
    };
    let value = "first 🎉\nsecond\n@[Bo](userId:2)";
    let markup = encode(value, &config, &BuiltinCatalog);
    assert_eq!(decode(&markup, &config), value);

    let markup = encode("x\r\ny\rz", &config, &BuiltinCatalog);
    let once = decode(&markup, &config);
    assert_eq!(once, "x\ny\nz");
    assert_eq!(encode(&once, &config, &BuiltinCatalog), markup);
}

#[test]
fn rendered_html_parses_back_to_the_same_markup() {
    let config = CodecConfig::default();
    for value in VALUES {
        let markup = encode(value, &config, &BuiltinCatalog);
        assert_eq!(parse_html(&render_html(&markup)), markup, "value {value:?}");
    }
}
