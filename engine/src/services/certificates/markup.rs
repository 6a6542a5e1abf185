//! Inline markup used in branding terms text.
//!
//! Terms are authored in a rich-text editor and arrive as light HTML. Only a
//! whitelist is interpreted: `<b>`/`<strong>`, `<i>`/`<em>`,
//! `<font color=..>` and `<span style="color: ..">`. `</p>` and `<br>` end a
//! line. Every other tag is dropped and its text kept; nothing is passed to
//! the PDF as markup.

use regex::Regex;
use std::sync::OnceLock;

/// RGB triple.
pub type Rgb = (u8, u8, u8);

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Rgb>,
}

impl TextSegment {
    fn same_style(&self, other: &TextSegment) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.color == other.color
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<\s*(/?)\s*([a-z][a-z0-9]*)([^>]*?)/?\s*>").expect("valid tag regex")
    })
}

fn line_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</\s*p\s*>|<\s*br\s*/?\s*>").expect("valid line-end regex"))
}

fn color_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)color\s*[=:]\s*["']?\s*(#[0-9a-f]{3,6}|rgb\s*\([^)]*\)|[a-z]+)"#)
            .expect("valid color regex")
    })
}

/// Splits terms text into display lines: one per non-blank line, where
/// `</p>` and `<br>` also break lines. Markup inside a line is kept.
pub fn split_lines(text: &str) -> Vec<String> {
    line_end_re()
        .replace_all(text, "\n")
        .lines()
        .filter(|line| !visible_text(line).trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect()
}

/// Text of a line with all tags removed and entities decoded.
pub fn visible_text(line: &str) -> String {
    parse_line(line).into_iter().map(|s| s.text).collect()
}

/// Parses one line into styled segments. Unbalanced closing tags are ignored;
/// unclosed opening tags style the rest of the line.
pub fn parse_line(line: &str) -> Vec<TextSegment> {
    let mut segments: Vec<TextSegment> = Vec::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut colors: Vec<(String, Option<Rgb>)> = Vec::new();
    let mut last = 0;

    for caps in tag_re().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut segments, &line[last..whole.start()], bold, italic, &colors);
        last = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        match (name.as_str(), closing) {
            ("b" | "strong", false) => bold += 1,
            ("b" | "strong", true) => bold = bold.saturating_sub(1),
            ("i" | "em", false) => italic += 1,
            ("i" | "em", true) => italic = italic.saturating_sub(1),
            ("font" | "span", false) => colors.push((name.clone(), color_from_attrs(attrs))),
            ("font" | "span", true) => {
                if let Some(pos) = colors.iter().rposition(|(tag, _)| *tag == name) {
                    colors.truncate(pos);
                }
            }
            _ => {}
        }
    }
    push_text(&mut segments, &line[last..], bold, italic, &colors);
    segments
}

fn push_text(
    segments: &mut Vec<TextSegment>,
    raw: &str,
    bold: usize,
    italic: usize,
    colors: &[(String, Option<Rgb>)],
) {
    if raw.is_empty() {
        return;
    }
    let segment = TextSegment {
        text: decode_entities(raw),
        bold: bold > 0,
        italic: italic > 0,
        color: colors.iter().rev().find_map(|(_, c)| *c),
    };
    match segments.last_mut() {
        Some(prev) if prev.same_style(&segment) => prev.text.push_str(&segment.text),
        _ => segments.push(segment),
    }
}

fn color_from_attrs(attrs: &str) -> Option<Rgb> {
    color_attr_re()
        .captures(attrs)
        .and_then(|caps| parse_color(caps.get(1)?.as_str()))
}

/// `#rrggbb`, `#rgb`, `rgb(r, g, b)` or a basic color name.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
                Some((expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        };
    }
    if let Some(inner) = value
        .strip_prefix("rgb")
        .map(str::trim_start)
        .and_then(|s| s.strip_prefix('('))
        .and_then(|s| s.strip_suffix(')'))
    {
        let parts: Vec<u8> = inner
            .split(',')
            .filter_map(|p| p.trim().parse::<u8>().ok())
            .collect();
        return match parts.as_slice() {
            [r, g, b] => Some((*r, *g, *b)),
            _ => None,
        };
    }
    match value.as_str() {
        "black" => Some((0, 0, 0)),
        "white" => Some((255, 255, 255)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "blue" => Some((0, 0, 255)),
        "navy" => Some((0, 0, 128)),
        "orange" => Some((255, 165, 0)),
        "purple" => Some((128, 0, 128)),
        "maroon" => Some((128, 0, 0)),
        "grey" | "gray" => Some((128, 128, 128)),
        _ => None,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> TextSegment {
        TextSegment {
            text: text.into(),
            bold: false,
            italic: false,
            color: None,
        }
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(parse_line("Clause 1: test term."), vec![plain("Clause 1: test term.")]);
    }

    #[test]
    fn bold_italic_and_color_are_recognised() {
        let segments =
            parse_line("1. Covers <b>manufacturing defects</b>, <i>not</i> <font color='blue'>misuse</font>.");
        assert_eq!(segments[0], plain("1. Covers "));
        assert!(segments[1].bold && segments[1].text == "manufacturing defects");
        assert!(segments[3].italic && segments[3].text == "not");
        assert_eq!(segments[5].color, Some((0, 0, 255)));
        assert_eq!(segments[5].text, "misuse");
        assert_eq!(segments.last().unwrap(), &plain("."));
    }

    #[test]
    fn nested_styles_combine() {
        let segments = parse_line("<strong><em>Void</em></strong> if opened");
        assert_eq!(
            segments[0],
            TextSegment {
                text: "Void".into(),
                bold: true,
                italic: true,
                color: None
            }
        );
        assert_eq!(segments[1], plain(" if opened"));
    }

    #[test]
    fn unknown_tags_are_dropped_and_entities_decoded() {
        assert_eq!(
            visible_text("<p><u>Terms</u> &amp; <script>x</script>Conditions</p>"),
            "Terms & xConditions"
        );
    }

    #[test]
    fn span_style_colors_use_rgb_syntax() {
        let segments = parse_line(r#"<span style="color: rgb(230, 0, 0);">Red</span> text"#);
        assert_eq!(segments[0].color, Some((230, 0, 0)));
        assert_eq!(segments[1], plain(" text"));
    }

    #[test]
    fn stray_closing_tags_are_harmless() {
        assert_eq!(parse_line("a</b>b"), vec![plain("ab")]);
    }

    #[test]
    fn lines_split_on_newlines_and_paragraphs() {
        let html = "<p><strong>Standard Warranty Terms</strong></p><p><br></p><p>1. Manufacturing defects only.</p>\n\n2. Void if damaged.";
        assert_eq!(
            split_lines(html),
            vec![
                "<p><strong>Standard Warranty Terms</strong>",
                "<p>1. Manufacturing defects only.",
                "2. Void if damaged.",
            ]
        );
    }

    #[test]
    fn colors_parse_in_all_notations() {
        assert_eq!(parse_color("#008000"), Some((0, 128, 0)));
        assert_eq!(parse_color("#f00"), Some((255, 0, 0)));
        assert_eq!(parse_color("RGB(1, 2, 3)"), Some((1, 2, 3)));
        assert_eq!(parse_color("Grey"), Some((128, 128, 128)));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }
}
