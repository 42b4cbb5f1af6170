// Engine rich-text markup parser. Log lines arrive with inline tags
// (<b>, <i>, <color=...>) that the UI renders as attributed text; the
// store keeps the stripped plain text plus the extracted style spans.
//
// Recognized tags are consumed even when their closer never arrives
// (an unclosed opener produces no span). Anything that does not parse as
// a known tag stays in the text verbatim, including unmatched closers.

use std::ops::Range;

/// RGBA color carried by a `<color=...>` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    /// Parse a tag color value: `#rgb`, `#rrggbb`, `#rrggbbaa`, or a
    /// named color. Returns None for anything unrecognized.
    pub fn parse(value: &str) -> Option<Color> {
        if let Some(hex) = value.strip_prefix('#') {
            return Color::parse_hex(hex);
        }
        let named = match value.to_ascii_lowercase().as_str() {
            "black" => Color::rgb(0x00, 0x00, 0x00),
            "white" => Color::rgb(0xff, 0xff, 0xff),
            "red" => Color::rgb(0xff, 0x00, 0x00),
            "green" => Color::rgb(0x00, 0xff, 0x00),
            "blue" => Color::rgb(0x00, 0x00, 0xff),
            "yellow" => Color::rgb(0xff, 0xeb, 0x04),
            "cyan" | "aqua" => Color::rgb(0x00, 0xff, 0xff),
            "magenta" | "fuchsia" => Color::rgb(0xff, 0x00, 0xff),
            "gray" | "grey" => Color::rgb(0x80, 0x80, 0x80),
            "orange" => Color::rgb(0xff, 0xa5, 0x00),
            "purple" => Color::rgb(0x80, 0x00, 0x80),
            "brown" => Color::rgb(0xa5, 0x2a, 0x2a),
            "olive" => Color::rgb(0x80, 0x80, 0x00),
            "navy" => Color::rgb(0x00, 0x00, 0x80),
            "teal" => Color::rgb(0x00, 0x80, 0x80),
            "maroon" => Color::rgb(0x80, 0x00, 0x00),
            "lime" => Color::rgb(0x00, 0xff, 0x00),
            "silver" => Color::rgb(0xc0, 0xc0, 0xc0),
            "lightblue" => Color::rgb(0xad, 0xd8, 0xe6),
            "darkblue" => Color::rgb(0x00, 0x00, 0x8b),
            _ => return None,
        };
        Some(named)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        fn nibble(b: u8) -> Option<u8> {
            match b {
                b'0'..=b'9' => Some(b - b'0'),
                b'a'..=b'f' => Some(b - b'a' + 10),
                b'A'..=b'F' => Some(b - b'A' + 10),
                _ => None,
            }
        }
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Some(Color::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 | 8 => {
                let mut chan = [0u8; 4];
                chan[3] = 0xff;
                for (i, pair) in bytes.chunks(2).enumerate() {
                    chan[i] = nibble(pair[0])? << 4 | nibble(pair[1])?;
                }
                Some(Color {
                    r: chan[0],
                    g: chan[1],
                    b: chan[2],
                    a: chan[3],
                })
            }
            _ => None,
        }
    }
}

/// Style carried by a span of the plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanStyle {
    Bold,
    Italic,
    BoldItalic,
    Color(Color),
}

/// A styled byte range of the plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub style: SpanStyle,
    pub range: Range<usize>,
}

/// A log message: stripped plain text plus extracted style spans.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RichText {
    text: String,
    spans: Vec<Span>,
}

// An opener waiting for its closing tag.
enum Open {
    Bold { start: usize },
    Italic { start: usize },
    Color { start: usize, color: Color },
}

impl RichText {
    /// Wrap a string without interpreting any markup.
    pub fn plain(text: impl Into<String>) -> Self {
        RichText {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Parse engine markup out of `input`.
    pub fn parse(input: &str) -> Self {
        let mut text = String::with_capacity(input.len());
        let mut spans = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut rest = input;

        while let Some(lt) = rest.find('<') {
            text.push_str(&rest[..lt]);
            let tag_input = &rest[lt..];
            match parse_tag(tag_input) {
                Some((tag, consumed)) => {
                    apply_tag(tag, &mut text, &mut spans, &mut stack);
                    rest = &tag_input[consumed..];
                }
                None => {
                    // Not a recognized tag: keep the '<' and move on.
                    text.push('<');
                    rest = &tag_input[1..];
                }
            }
        }
        text.push_str(rest);

        // Unclosed openers: markup already stripped, no span emitted.
        spans.sort_by_key(|s| s.range.start);
        RichText { text, spans }
    }

    /// Stripped plain text. Collapse equality compares this.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for RichText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

enum Tag {
    OpenBold,
    CloseBold,
    OpenItalic,
    CloseItalic,
    OpenColor(Color),
    CloseColor,
}

/// Try to parse a tag at the head of `input` (which starts with '<').
/// Returns the tag and the number of bytes consumed.
fn parse_tag(input: &str) -> Option<(Tag, usize)> {
    let end = input.find('>')?;
    let body = &input[1..end];
    let consumed = end + 1;
    let tag = match body {
        "b" => Tag::OpenBold,
        "/b" => Tag::CloseBold,
        "i" => Tag::OpenItalic,
        "/i" => Tag::CloseItalic,
        "/color" => Tag::CloseColor,
        _ => {
            let value = body.strip_prefix("color=")?;
            Tag::OpenColor(Color::parse(value)?)
        }
    };
    Some((tag, consumed))
}

fn apply_tag(tag: Tag, text: &mut String, spans: &mut Vec<Span>, stack: &mut Vec<Open>) {
    let here = text.len();
    match tag {
        Tag::OpenBold => stack.push(Open::Bold { start: here }),
        Tag::OpenItalic => stack.push(Open::Italic { start: here }),
        Tag::OpenColor(color) => stack.push(Open::Color { start: here, color }),
        Tag::CloseBold => close_style(spans, stack, here, true, text),
        Tag::CloseItalic => close_style(spans, stack, here, false, text),
        Tag::CloseColor => {
            let matching = stack
                .iter()
                .rposition(|open| matches!(open, Open::Color { .. }));
            match matching {
                Some(pos) => {
                    if let Open::Color { start, color } = stack.remove(pos) {
                        if start < here {
                            spans.push(Span {
                                style: SpanStyle::Color(color),
                                range: start..here,
                            });
                        }
                    }
                }
                // Unmatched closer stays verbatim.
                None => text.push_str("</color>"),
            }
        }
    }
}

fn close_style(
    spans: &mut Vec<Span>,
    stack: &mut Vec<Open>,
    here: usize,
    bold: bool,
    text: &mut String,
) {
    let matching = stack.iter().rposition(|open| match open {
        Open::Bold { .. } => bold,
        Open::Italic { .. } => !bold,
        Open::Color { .. } => false,
    });
    let Some(pos) = matching else {
        text.push_str(if bold { "</b>" } else { "</i>" });
        return;
    };
    let start = match stack.remove(pos) {
        Open::Bold { start } | Open::Italic { start } => start,
        Open::Color { .. } => unreachable!(),
    };
    if start >= here {
        return;
    }
    // A bold span inside an italic one (or vice versa) renders bold-italic.
    let nested_other = stack.iter().any(|open| match open {
        Open::Bold { start: s } => !bold && *s <= start,
        Open::Italic { start: s } => bold && *s <= start,
        Open::Color { .. } => false,
    });
    let style = if nested_other {
        SpanStyle::BoldItalic
    } else if bold {
        SpanStyle::Bold
    } else {
        SpanStyle::Italic
    };
    spans.push(Span {
        style,
        range: start..here,
    });
}
