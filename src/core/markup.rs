//! # Message Markup
//!
//! Message bodies are stored as HTML-flavored markup. User text is escaped on
//! the way in so it always displays literally; bot replies arrive from the
//! backend already formatted and are kept as-is (or run through
//! [`sanitize`] when the trust boundary is tightened in config).
//!
//! Markup is parsed with `scraper` (html5ever), so entities, quoted
//! attributes and unclosed elements follow browser rules. The tree is then
//! flattened into [`Fragment`]s over the vocabulary the chat backend emits
//! (`<br>`, `<strong>`, `<em>`, `<code>`, block elements). This module knows
//! nothing about terminals; `tui::markup` turns fragments into styled lines.

use scraper::{ElementRef, Html};

/// Escape text so it can be embedded in markup and displayed literally.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop control characters (raw or decoded from `&#..;`) that would reach the
/// terminal as escape sequences. Newlines and tabs survive.
fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// Elements the renderer gives meaning to. Everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Bold,
    Italic,
    /// Inline `<code>`.
    Code,
    /// `<pre>` or `<code class="code-block">`.
    CodeBlock,
    /// Block-level container (`p`, `div`, headings, lists): starts a new line.
    Block,
    ListItem,
    /// Content is never displayed (`script`, `style`).
    Hidden,
    Other(String),
}

impl Tag {
    fn from_element(name: &str, class: Option<&str>) -> Self {
        let has_class =
            |wanted: &str| class.is_some_and(|list| list.split_whitespace().any(|c| c == wanted));
        match name {
            "b" | "strong" => Tag::Bold,
            "i" | "em" => Tag::Italic,
            "code" if has_class("code-block") => Tag::CodeBlock,
            "code" => Tag::Code,
            "pre" => Tag::CodeBlock,
            "p" | "div" | "ul" | "ol" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5"
            | "h6" => Tag::Block,
            "li" => Tag::ListItem,
            "script" | "style" => Tag::Hidden,
            other => Tag::Other(other.to_string()),
        }
    }
}

/// One token of parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Decoded text content.
    Text(String),
    /// `<br>` in any of its spellings.
    LineBreak,
    Open(Tag),
    Close(Tag),
}

/// Tokenize markup into fragments. Never fails: html5ever recovers from any
/// input, and a `<` that does not start a tag is text.
pub fn parse(markup: &str) -> Vec<Fragment> {
    let fragment = Html::parse_fragment(markup);
    let mut fragments = Vec::new();
    flatten(fragment.root_element(), &mut fragments);
    fragments
}

fn flatten(element: ElementRef<'_>, out: &mut Vec<Fragment>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let el = child_element.value();
            if el.name() == "br" {
                out.push(Fragment::LineBreak);
                continue;
            }
            let tag = Tag::from_element(el.name(), el.attr("class"));
            out.push(Fragment::Open(tag.clone()));
            flatten(child_element, out);
            out.push(Fragment::Close(tag));
        } else if let Some(text) = child.value().as_text() {
            let text = strip_controls(text);
            if text.is_empty() {
                continue;
            }
            match out.last_mut() {
                Some(Fragment::Text(prev)) => prev.push_str(&text),
                _ => out.push(Fragment::Text(text)),
            }
        }
    }
}

/// Elements allowed through [`sanitize`].
const ALLOWED_ELEMENTS: &[&str] = &[
    "b", "strong", "i", "em", "code", "pre", "br", "p", "div", "span", "ul", "ol", "li",
    "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Elements removed together with everything inside them.
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "noscript", "template"];

/// Allow-list sanitization of untrusted markup.
///
/// Allowed elements keep only their `class` attribute, disallowed elements are
/// unwrapped (their text survives), and `script`/`style`-like elements are
/// removed with their content. Text is re-escaped on the way out.
pub fn sanitize(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    write_sanitized(fragment.root_element(), &mut out);
    out
}

fn write_sanitized(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let el = child_element.value();
            let name = el.name();
            if DROPPED_ELEMENTS.contains(&name) {
                continue;
            }
            if !ALLOWED_ELEMENTS.contains(&name) {
                write_sanitized(child_element, out);
                continue;
            }

            out.push('<');
            out.push_str(name);
            if let Some(class) = el.attr("class") {
                out.push_str(" class=\"");
                out.push_str(&escape_html(class));
                out.push('"');
            }
            out.push('>');
            if name == "br" {
                continue;
            }
            write_sanitized(child_element, out);
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        } else if let Some(text) = child.value().as_text() {
            out.push_str(&escape_html(&strip_controls(text)));
        }
    }
}

/// Plain text content of markup (tags removed, entities decoded, hidden
/// elements skipped). Used for log lines.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::new();
    let mut hidden = 0usize;
    for fragment in parse(markup) {
        match fragment {
            Fragment::Text(t) if hidden == 0 => out.push_str(&t),
            Fragment::LineBreak if hidden == 0 => out.push('\n'),
            Fragment::Open(Tag::Hidden) => hidden += 1,
            Fragment::Close(Tag::Hidden) => hidden = hidden.saturating_sub(1),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn escaped_text_parses_back_to_literal_text() {
        let typed = "<b>not bold</b> & \"quoted\"";
        let fragments = parse(&escape_html(typed));
        assert_eq!(fragments, vec![Fragment::Text(typed.to_string())]);
    }

    #[test]
    fn parse_decodes_numeric_entities_and_keeps_unknown() {
        assert_eq!(
            parse("&#65;&#x42; fish &amp; chips &bogus;"),
            vec![Fragment::Text("AB fish & chips &bogus;".into())]
        );
    }

    #[test]
    fn parse_strips_control_characters() {
        assert_eq!(
            parse("a&#1;b\u{1b}[31mc\td\ne"),
            vec![Fragment::Text("ab[31mc\td\ne".into())]
        );
    }

    #[test]
    fn parse_recognizes_backend_vocabulary() {
        let fragments = parse("Hi<br><strong>there</strong> <em>you</em>");
        assert_eq!(
            fragments,
            vec![
                Fragment::Text("Hi".into()),
                Fragment::LineBreak,
                Fragment::Open(Tag::Bold),
                Fragment::Text("there".into()),
                Fragment::Close(Tag::Bold),
                Fragment::Text(" ".into()),
                Fragment::Open(Tag::Italic),
                Fragment::Text("you".into()),
                Fragment::Close(Tag::Italic),
            ]
        );
    }

    #[test]
    fn parse_distinguishes_code_block_class() {
        let fragments = parse(r#"<code class="code-block">x</code><code class="inline-code">y</code>"#);
        assert_eq!(fragments[0], Fragment::Open(Tag::CodeBlock));
        assert_eq!(fragments[3], Fragment::Open(Tag::Code));
    }

    #[test]
    fn parse_br_spellings() {
        assert_eq!(
            parse("a<br/>b<BR />c"),
            vec![
                Fragment::Text("a".into()),
                Fragment::LineBreak,
                Fragment::Text("b".into()),
                Fragment::LineBreak,
                Fragment::Text("c".into()),
            ]
        );
    }

    #[test]
    fn parse_treats_stray_angle_bracket_as_text() {
        assert_eq!(parse("1 < 2"), vec![Fragment::Text("1 < 2".into())]);
        assert_eq!(parse("a <> b"), vec![Fragment::Text("a <> b".into())]);
    }

    #[test]
    fn parse_handles_quoted_angle_bracket_in_attribute() {
        assert_eq!(
            parse(r#"<b title="a>b">x</b>"#),
            vec![
                Fragment::Open(Tag::Bold),
                Fragment::Text("x".into()),
                Fragment::Close(Tag::Bold),
            ]
        );
    }

    #[test]
    fn parse_closes_unterminated_elements() {
        assert_eq!(
            parse("<em>open"),
            vec![
                Fragment::Open(Tag::Italic),
                Fragment::Text("open".into()),
                Fragment::Close(Tag::Italic),
            ]
        );
    }

    #[test]
    fn sanitize_keeps_allowed_and_strips_attributes() {
        assert_eq!(sanitize(r#"<b onclick="x()">hi</b>"#), "<b>hi</b>");
        assert_eq!(
            sanitize(r#"<code class="code-block" data-x="1">x</code>"#),
            r#"<code class="code-block">x</code>"#
        );
        assert_eq!(sanitize(r#"<b title="a>b">x</b>"#), "<b>x</b>");
    }

    #[test]
    fn sanitize_drops_script_content_and_unwraps_unknown() {
        assert_eq!(sanitize("a<script>alert(1)</script>b<img src=x>c"), "abc");
        assert_eq!(sanitize("<a href='x'>link</a>"), "link");
        assert_eq!(sanitize("one<br>two"), "one<br>two");
    }

    #[test]
    fn sanitize_reescapes_text() {
        assert_eq!(sanitize("1 &lt; 2 <b>&amp;</b>"), "1 &lt; 2 <b>&amp;</b>");
    }

    #[test]
    fn plain_text_skips_hidden_content() {
        assert_eq!(plain_text("a<br><b>b</b><style>p{}</style>"), "a\nb");
    }
}
