//! Equation tokenizer.
//!
//! Splits plain text into alternating text and equation segments using
//! `$$...$$` (display) and `$...$` (inline) markers. The scanner is a small
//! two-state machine over byte offsets; `$` is ASCII, so every offset it
//! stops on is a valid UTF-8 boundary.

use std::ops::Range;

use eqforge_core::Segment;

const DISPLAY: &str = "$$";
const INLINE: &str = "$";

/// Which marker opened the current equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Display,
    Inline,
}

impl Marker {
    fn delimiter(self) -> &'static str {
        match self {
            Marker::Display => DISPLAY,
            Marker::Inline => INLINE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Outside,
    Inside { marker: Marker, open: usize },
}

/// A segment together with the byte range of the source it was taken from.
///
/// For equations the span covers the markers as well as the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub segment: Segment,
    pub span: Range<usize>,
}

/// Tokenize `text` into text and equation segments.
///
/// Text between matches is kept verbatim; equation expressions are trimmed.
/// Text without markers comes back as a single text segment (or nothing,
/// for the empty string).
pub fn tokenize(text: &str) -> Vec<Segment> {
    scan(text).into_iter().map(|token| token.segment).collect()
}

/// Like [`tokenize`], but keeps the source span of every segment.
///
/// Concatenating `&text[token.span]` over the result reproduces `text`.
pub fn scan(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut state = State::Outside;
    // Start of the literal text not yet emitted.
    let mut literal_start = 0;
    let mut cursor = 0;

    loop {
        match state {
            State::Outside => {
                let Some(offset) = text[cursor..].find('$') else {
                    break;
                };
                let open = cursor + offset;
                let marker = if bytes.get(open + 1) == Some(&b'$') {
                    Marker::Display
                } else if open + 1 < bytes.len() {
                    Marker::Inline
                } else {
                    // Lone `$` at the very end.
                    break;
                };
                cursor = open + marker.delimiter().len();
                state = State::Inside { marker, open };
            }
            State::Inside { marker, open } => {
                let delimiter = marker.delimiter();
                match text[cursor..].find(delimiter) {
                    Some(offset) => {
                        let close = cursor + offset;
                        push_text(&mut tokens, text, literal_start..open);
                        let end = close + delimiter.len();
                        tokens.push(Token {
                            segment: Segment::Equation {
                                expression: text[cursor..close].trim().to_string(),
                            },
                            span: open..end,
                        });
                        literal_start = end;
                        cursor = end;
                    }
                    None => {
                        // Dangling opener: the marker stays literal and
                        // scanning resumes right after it.
                        cursor = open + delimiter.len();
                    }
                }
                state = State::Outside;
            }
        }
    }

    push_text(&mut tokens, text, literal_start..text.len());
    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str, span: Range<usize>) {
    if span.is_empty() {
        return;
    }
    tokens.push(Token {
        segment: Segment::Text {
            content: text[span.clone()].to_string(),
        },
        span,
    });
}
