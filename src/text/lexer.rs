//! Lexer for field text templates using logos
//!
//! Field text is mostly literal. The only syntax is a variable reference,
//! `${NAME}`, which runs from the opening `${` to the first `}`.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("${")]
    VarOpen,

    #[token("}")]
    VarClose,

    /// A `$` that does not start a variable
    #[token("$")]
    Dollar,

    #[regex(r"[^$}]+")]
    Text,
}

/// A piece of template text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied through unchanged
    Literal(&'a str),
    /// The name between `${` and `}` (may be empty)
    Variable(&'a str),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Text), span))
}

/// Split template text into literal runs and variable references.
///
/// A `${` with no closing brace is kept as literal text.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start: Option<usize> = None;
    let mut open: Option<usize> = None;

    for (tok, span) in lex(input) {
        match (open, tok) {
            (Some(start), Token::VarClose) => {
                out.push(Segment::Variable(&input[start..span.start]));
                open = None;
            }
            (Some(_), _) => {}
            (None, Token::VarOpen) => {
                if let Some(ls) = literal_start.take() {
                    out.push(Segment::Literal(&input[ls..span.start]));
                }
                open = Some(span.end);
            }
            (None, _) => {
                literal_start.get_or_insert(span.start);
            }
        }
    }

    if let Some(start) = open {
        // unterminated reference: the `${` and everything after it is literal
        out.push(Segment::Literal(&input[start - "${".len()..]));
    } else if let Some(ls) = literal_start {
        out.push(Segment::Literal(&input[ls..]));
    }

    out
}
