//! Property-based tests for the reader's whitespace rule
//!
//! Blank text containing a line break is formatting and never reaches the markup; any text
//! with a visible character is kept as written.

use jsonml::config::{ConversionConfig, Settings, WhitespaceRule};
use jsonml::html::from_html_text;
use jsonml::{Converter, Dialect, Element, MarkupNode};
use proptest::prelude::*;

fn pair(children: Vec<MarkupNode>) -> Option<MarkupNode> {
    let mut div = Element::new("div");
    div.children = children;
    Some(div.into())
}

fn bold(text: &str) -> MarkupNode {
    Element::new("b").child(text).into()
}

proptest! {
    #[test]
    fn line_breaks_between_elements_are_dropped(gap in "[ \t]{0,3}\n[ \t\n]{0,4}") {
        let html = format!("<div><b>x</b>{}<b>y</b></div>", gap);
        prop_assert_eq!(from_html_text(&html, None), pair(vec![bold("x"), bold("y")]));
    }

    #[test]
    fn spaces_between_elements_are_kept(gap in "[ \t]{1,4}") {
        let html = format!("<div><b>x</b>{}<b>y</b></div>", gap);
        prop_assert_eq!(
            from_html_text(&html, None),
            pair(vec![bold("x"), MarkupNode::text(gap.clone()), bold("y")])
        );
    }

    #[test]
    fn visible_text_is_kept(text in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,12}") {
        let html = format!("<p>{}</p>", text);
        prop_assert_eq!(
            from_html_text(&html, None),
            Some(Element::new("p").child(text.as_str()).into())
        );
    }
}

#[test]
fn unicode_rule_also_drops_non_ascii_spaces() {
    let html = "<div><b>x</b>\u{a0}\n<b>y</b></div>";

    let kept = from_html_text(html, None);
    assert_eq!(
        kept,
        pair(vec![bold("x"), MarkupNode::text("\u{a0}\n"), bold("y")])
    );

    let mut settings = Settings::default();
    settings.reader.whitespace = WhitespaceRule::Unicode;
    let converter = Converter::new(Dialect::Html, ConversionConfig::new(settings));
    assert_eq!(converter.read_text(html, None), pair(vec![bold("x"), bold("y")]));
}

#[test]
fn preserve_rule_keeps_everything() {
    let mut settings = Settings::default();
    settings.reader.whitespace = WhitespaceRule::Preserve;
    let converter = Converter::new(Dialect::Html, ConversionConfig::new(settings));
    assert_eq!(
        converter.read_text("<div><b>x</b>\n<b>y</b></div>", None),
        pair(vec![bold("x"), MarkupNode::text("\n"), bold("y")])
    );
}
