//! logos-based tokenizers for widget names and name patterns.
//!
//! [`NameToken`] splits a declared name on the two reserved delimiters:
//! `#` opens a tag and `.` separates hierarchy levels. Every other character
//! belongs to a segment, so the lexer never fails on real input.
//!
//! [`PatternToken`] lexes compact name lists such as `chk021-23, 25, tb001`.

use logos::Logos;

/// Token of a declared widget/UI name.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameToken {
    /// `#`: starts a tag.
    #[token("#")]
    Tag,

    /// `.`: hierarchy separator.
    #[token(".")]
    Dot,

    /// Any run of characters that are not delimiters.
    #[regex(r"[^#.]+")]
    Segment,
}

/// Token of a comma-separated name pattern.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum PatternToken {
    /// Alphabetic prefix such as `chk`.
    #[regex(r"[a-zA-Z_]+")]
    Alpha,

    /// Decimal digits, kept as text so leading zeros survive.
    #[regex(r"[0-9]+")]
    Digits,

    /// `-` between the two ends of a range.
    #[token("-")]
    Dash,

    /// `,` between entries.
    #[token(",")]
    Comma,
}

/// Lex `input` into `(token, slice)` pairs.
///
/// Unrecognized input is reported as `None` so callers can treat it
/// literally instead of failing.
pub fn lex_name(input: &str) -> Vec<(Option<NameToken>, &str)> {
    let mut lexer = NameToken::lexer(input);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        out.push((result.ok(), lexer.slice()));
    }
    out
}

/// Lex a name pattern into `(token, slice)` pairs. See [`lex_name`].
pub fn lex_pattern(input: &str) -> Vec<(Option<PatternToken>, &str)> {
    let mut lexer = PatternToken::lexer(input);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        out.push((result.ok(), lexer.slice()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_kinds(input: &str) -> Vec<NameToken> {
        lex_name(input).into_iter().filter_map(|(t, _)| t).collect()
    }

    #[test]
    fn plain_name_is_one_segment() {
        assert_eq!(name_kinds("save_btn"), vec![NameToken::Segment]);
    }

    #[test]
    fn tags_and_dots() {
        assert_eq!(
            name_kinds("main.file#sub"),
            vec![
                NameToken::Segment,
                NameToken::Dot,
                NameToken::Segment,
                NameToken::Tag,
                NameToken::Segment,
            ]
        );
    }

    #[test]
    fn unusual_characters_stay_in_segment() {
        let tokens = lex_name("a b-c/é");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], (Some(NameToken::Segment), "a b-c/é"));
    }

    #[test]
    fn pattern_tokens() {
        let tokens: Vec<_> = lex_pattern("chk021-23, 25")
            .into_iter()
            .map(|(t, s)| (t.unwrap(), s))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (PatternToken::Alpha, "chk"),
                (PatternToken::Digits, "021"),
                (PatternToken::Dash, "-"),
                (PatternToken::Digits, "23"),
                (PatternToken::Comma, ","),
                (PatternToken::Digits, "25"),
            ]
        );
    }

    #[test]
    fn pattern_unknown_character_is_none() {
        let tokens = lex_pattern("a*");
        assert_eq!(tokens[0].0, Some(PatternToken::Alpha));
        assert_eq!(tokens[1].0, None);
    }
}
