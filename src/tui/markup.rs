//! Message markup → ratatui `Text` renderer.
//!
//! Walks the fragments from `core::markup::parse` and converts them into
//! styled `Line`/`Span` values: line breaks, bold, italic, inline code, code
//! blocks, list items and block elements. Unknown tags are transparent (their
//! text shows), `script`/`style` content is never shown.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::markup::{Fragment, Tag, parse};

/// Render markup into styled `Text` on top of `base`.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(markup: &str, base: Style) -> Text<'static> {
    let mut w = Writer::new(base);
    for fragment in parse(markup) {
        w.handle(fragment);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base: Style,
    /// Inline style stack. Styles compose via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (code block `│`).
    line_prefixes: Vec<Span<'static>>,
    /// Open `<code>`/`<pre>` elements; `true` = block.
    code_stack: Vec<bool>,
    /// Depth inside `script`/`style`.
    hidden: usize,
    /// A block boundary was crossed: the next content starts a new line.
    needs_line: bool,
}

impl Writer {
    fn new(base: Style) -> Self {
        Self {
            text: Text::default(),
            base,
            styles: vec![],
            line_prefixes: vec![],
            code_stack: vec![],
            hidden: 0,
            needs_line: false,
        }
    }

    // ── Style helpers ───────────────────────────────────────────────────

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.needs_line {
            self.needs_line = false;
            if !self.current_line_is_blank() {
                self.push_line(Line::default());
            }
        }
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    /// True when there is no line yet or the last line holds only prefixes.
    fn current_line_is_blank(&self) -> bool {
        self.text
            .lines
            .last()
            .is_none_or(|l| l.spans.len() <= self.line_prefixes.len())
    }

    fn line_break(&mut self) {
        if self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        self.push_line(Line::default());
        self.needs_line = false;
    }

    // ── Fragment dispatch ───────────────────────────────────────────────

    fn handle(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Open(Tag::Hidden) => self.hidden += 1,
            Fragment::Close(Tag::Hidden) => self.hidden = self.hidden.saturating_sub(1),
            _ if self.hidden > 0 => {}
            Fragment::Text(t) => self.text_content(&t),
            Fragment::LineBreak => self.line_break(),
            Fragment::Open(tag) => self.open(tag),
            Fragment::Close(tag) => self.close(tag),
        }
    }

    fn text_content(&mut self, content: &str) {
        let content = content.replace('\t', "    ");
        let style = self.style();
        for (i, part) in content.split('\n').enumerate() {
            if i > 0 {
                self.line_break();
            }
            if !part.is_empty() {
                self.push_span(Span::styled(part.to_string(), style));
            }
        }
    }

    fn open(&mut self, tag: Tag) {
        match tag {
            Tag::Bold => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Italic => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Code => {
                self.code_stack.push(false);
                self.push_style(code_style());
            }
            Tag::CodeBlock => {
                self.code_stack.push(true);
                let bs = Style::default().fg(Color::DarkGray);
                self.push_line(Line::from(Span::styled("╭──", bs)));
                self.line_prefixes.push(Span::styled("│ ", bs));
                self.push_line(Line::default());
                self.push_style(Style::default().fg(Color::White));
                self.needs_line = false;
            }
            Tag::Block => self.needs_line = true,
            Tag::ListItem => {
                self.needs_line = true;
                self.push_span(Span::styled("• ", Style::default().fg(Color::DarkGray)));
            }
            Tag::Hidden | Tag::Other(_) => {}
        }
    }

    fn close(&mut self, tag: Tag) {
        match tag {
            Tag::Bold | Tag::Italic => self.pop_style(),
            Tag::Code | Tag::CodeBlock => match self.code_stack.pop() {
                Some(true) => {
                    self.pop_style();
                    // Drop a trailing empty code line before the bottom border
                    if self.current_line_is_blank() {
                        self.text.lines.pop();
                    }
                    self.line_prefixes.pop();
                    let bs = Style::default().fg(Color::DarkGray);
                    self.push_line(Line::from(Span::styled("╰──", bs)));
                    self.needs_line = true;
                }
                Some(false) => self.pop_style(),
                None => {}
            },
            Tag::Block | Tag::ListItem => self.needs_line = true,
            Tag::Hidden | Tag::Other(_) => {}
        }
    }
}

fn code_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

/// Flatten rendered text to plain strings, one per line.
#[cfg(test)]
pub fn lines_as_strings(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::markup::escape_html;

    fn base() -> Style {
        Style::default().fg(Color::Green)
    }

    #[test]
    fn plain_text_uses_base_style() {
        let text = render("hello", base());
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("Some <b>bold</b> text", base());
        let bold = text.lines[0].spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(bold.style.fg, Some(Color::Green));
        let after = text.lines[0].spans.iter().find(|s| s.content == " text").unwrap();
        assert!(!after.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn nested_bold_italic_compose() {
        let text = render("<strong><em>both</em></strong>", base());
        let span = &text.lines[0].spans[0];
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
        assert!(span.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn br_splits_lines() {
        let text = render("one<br>two<br><br>four", base());
        assert_eq!(lines_as_strings(&text), vec!["one", "two", "", "four"]);
    }

    #[test]
    fn escaped_script_displays_literally() {
        let typed = "<script>alert('x')</script>";
        let text = render(&escape_html(typed), base());
        assert_eq!(lines_as_strings(&text), vec![typed]);
    }

    #[test]
    fn script_content_is_not_displayed() {
        let text = render("a<script>alert(1)</script>b", base());
        assert_eq!(lines_as_strings(&text), vec!["ab"]);
    }

    #[test]
    fn inline_code_styled() {
        let text = render(r#"Use <code class="inline-code">foo()</code> here"#, base());
        let code = text.lines[0].spans.iter().find(|s| s.content == "foo()").unwrap();
        assert_eq!(code.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn code_block_has_border_structure() {
        let text = render(r#"see<code class="code-block">line1<br>line2</code>done"#, base());
        let lines = lines_as_strings(&text);
        assert_eq!(lines[0], "see");
        assert!(lines[1].starts_with('╭'), "expected top border, got {:?}", lines[1]);
        assert_eq!(lines[2], "│ line1");
        assert_eq!(lines[3], "│ line2");
        assert!(lines[4].starts_with('╰'), "expected bottom border, got {:?}", lines[4]);
        assert_eq!(lines[5], "done");
    }

    #[test]
    fn block_elements_start_new_lines() {
        let text = render("<p>first</p><p>second</p><ul><li>a</li><li>b</li></ul>", base());
        assert_eq!(lines_as_strings(&text), vec!["first", "second", "• a", "• b"]);
    }

    #[test]
    fn newlines_in_text_are_kept() {
        let text = render("line one\nline two", base());
        assert_eq!(lines_as_strings(&text), vec!["line one", "line two"]);
    }

    #[test]
    fn unknown_tags_are_transparent() {
        let text = render("<span class=\"x\">inside</span>", base());
        assert_eq!(lines_as_strings(&text), vec!["inside"]);
    }
}
