//! Segmentation of a pattern into lexemes and their syntactic
//! classification.
//!
//! The tokenizer walks a byte cursor over the pattern source and returns one
//! lexeme at a time as a slice of the original text. Bracketed constructs
//! (`[…]`, `{…}`, `(…)`) and escape sequences come back as single atomic
//! tokens so the parser and the sub-grammar parsers can re-read them.
//! Classification inspects only the first few characters of a token.

/// Syntactic category of a lexeme. `Concat` is never produced by the
/// classifier; the parser synthesises it for adjacent atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Char,
    Quantifier,
    Alternation,
    Concat,
    Group,
    Assertion,
    Error,
}

/// A token cursor over a pattern source.
///
/// # Example
///
/// ```
/// use rangex_compiler::lexer::Cursor;
///
/// let mut cursor = Cursor::new("a(bc)*");
/// assert_eq!(Some("a"), cursor.next_token());
/// assert_eq!(Some("(bc)"), cursor.next_token());
/// assert_eq!(Some("*"), cursor.next_token());
/// assert_eq!(None, cursor.next_token());
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Produces the next token, advancing the cursor past it. Returns `None`
    /// at end of input and for structurally invalid tokens (unmatched
    /// closers, unclosed brackets, truncated escapes); the cursor does not
    /// advance over invalid input.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut chars = self.src[start..].chars();
        let first = chars.next()?;

        match first {
            '|' | '.' | '^' | '$' => {
                self.pos = start + first.len_utf8();
                Some(&self.src[start..self.pos])
            }
            // repetition operators keep a trailing non-greedy marker
            '*' | '+' | '?' => {
                let mut end = start + first.len_utf8();
                if chars.next() == Some('?') {
                    end += 1;
                }
                self.pos = end;
                Some(&self.src[start..end])
            }
            '\\' => {
                let end = skip_escape(self.src, start);
                if end == start {
                    return None;
                }
                self.pos = end;
                Some(&self.src[start..end])
            }
            '[' | '{' => self.bracketed(start, first),
            '(' => self.grouped(start),
            ']' | '}' | ')' => None,
            _ => {
                self.pos = start + first.len_utf8();
                Some(&self.src[start..self.pos])
            }
        }
    }

    /// Scans to the first unescaped closer matching `opener`; the bracketed
    /// forms do not nest.
    fn bracketed(&mut self, start: usize, opener: char) -> Option<&'a str> {
        let closer = if opener == '[' { ']' } else { '}' };

        let mut at = start + opener.len_utf8();
        while at < self.src.len() {
            let skipped = skip_escape(self.src, at);
            if skipped != at {
                at = skipped;
                continue;
            }
            let current = self.src[at..].chars().next()?;
            if current == closer {
                self.pos = at + current.len_utf8();
                return Some(&self.src[start..self.pos]);
            }
            at += current.len_utf8();
        }

        None
    }

    /// Scans to the parenthesis closing the group, honouring nesting and
    /// escapes.
    fn grouped(&mut self, start: usize) -> Option<&'a str> {
        let mut depth = 1usize;

        let mut at = start + 1;
        while depth != 0 && at < self.src.len() {
            let skipped = skip_escape(self.src, at);
            if skipped != at {
                at = skipped;
                continue;
            }
            let current = self.src[at..].chars().next()?;
            match current {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            at += current.len_utf8();
        }

        if depth == 0 {
            self.pos = at;
            Some(&self.src[start..at])
        } else {
            None
        }
    }
}

/// Returns the byte offset immediately after the escape sequence starting at
/// `at`, or `at` itself when no valid escape is present (including a
/// truncated one at end of input).
///
/// `\` followed by decimal digits consumes them all (a back-reference);
/// `\u`, `\x` and `\c` take four, two and one trailing characters; any other
/// character after the backslash is a single escaped literal.
pub fn skip_escape(src: &str, at: usize) -> usize {
    let mut chars = src[at..].chars();
    if chars.next() != Some('\\') {
        return at;
    }

    let digits = chars
        .clone()
        .take_while(char::is_ascii_digit)
        .count();
    if digits > 0 {
        return at + 1 + digits;
    }

    let Some(designator) = chars.next() else {
        return at;
    };
    let trailing = match designator {
        'u' => 4,
        'x' => 2,
        'c' => 1,
        _ => 0,
    };

    let mut end = at + 1 + designator.len_utf8();
    for _ in 0..trailing {
        match chars.next() {
            Some(c) => end += c.len_utf8(),
            None => return at,
        }
    }
    end
}

/// Maps a token to its syntactic category from its first characters.
pub fn classify(token: &str) -> TokenKind {
    let mut chars = token.chars();
    match chars.next() {
        None => TokenKind::Error,
        Some('|') => TokenKind::Alternation,
        Some('*' | '+' | '?' | '{') => TokenKind::Quantifier,
        Some('^' | '$') => TokenKind::Assertion,
        Some('\\') => match chars.next() {
            Some('b' | 'B') => TokenKind::Assertion,
            _ => TokenKind::Char,
        },
        Some('(') => match chars.next() {
            Some('?') => match chars.next() {
                Some('=' | '!') => TokenKind::Assertion,
                Some(':') => TokenKind::Group,
                Some('<') => match chars.next() {
                    Some('=' | '!') => TokenKind::Assertion,
                    Some(c) if c.is_alphanumeric() || c == '_' => TokenKind::Group,
                    _ => TokenKind::Error,
                },
                _ => TokenKind::Error,
            },
            _ => TokenKind::Group,
        },
        Some(_) => TokenKind::Char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pattern: &str) -> Vec<&str> {
        let mut cursor = Cursor::new(pattern);
        let mut collected = Vec::new();
        while let Some(token) = cursor.next_token() {
            collected.push(token);
        }
        collected
    }

    #[test]
    fn should_tokenize_classes_and_quantifiers_atomically() {
        assert_eq!(
            vec!["[A-Za-z_]", "[A-Za-z0-9_]", "*"],
            tokens("[A-Za-z_][A-Za-z0-9_]*")
        );
    }

    #[test]
    fn should_tokenize_escapes_as_single_lexemes() {
        assert_eq!(vec!["\\w", "\\.", "c", "p", "p"], tokens("\\w\\.cpp"));
    }

    #[test]
    fn should_tokenize_groups_atomically() {
        assert_eq!(vec!["^", "\\w", "\\.", "(cpp|c)"], tokens("^\\w\\.(cpp|c)"));
    }

    #[test]
    fn should_honor_group_nesting() {
        assert_eq!(
            vec!["((0x|0X)[0-9a-fA-F]+)", "(u|U|l|L)", "*"],
            tokens("((0x|0X)[0-9a-fA-F]+)(u|U|l|L)*")
        );
    }

    #[test]
    fn should_stop_at_an_unmatched_closer() {
        assert_eq!(
            vec!["^", "\\w", "\\.", "c", "p", "p", "|", "c"],
            tokens("^\\w\\.cpp|c)")
        );
    }

    #[test]
    fn should_stop_at_an_unclosed_group() {
        assert_eq!(vec!["^", "\\w", "\\."], tokens("^\\w\\.(cpp|c"));
    }

    #[test]
    fn should_skip_escaped_parentheses_inside_groups() {
        assert_eq!(vec![r"(\(\w\))", "+"], tokens(r"(\(\w\))+"));
    }

    #[test]
    fn should_reject_a_trailing_backslash() {
        assert!(tokens("\\").is_empty());
        assert_eq!(vec!["a"], tokens("a\\"));
    }

    #[test]
    fn should_keep_the_non_greedy_marker_on_repetitions() {
        assert_eq!(vec!["a", "+?", "a", "b"], tokens("a+?ab"));
        assert_eq!(vec!["a", "*?"], tokens("a*?"));
        assert_eq!(vec!["a", "??"], tokens("a??"));
    }

    #[test]
    fn should_consume_all_backreference_digits() {
        assert_eq!(vec!["(a)", "\\12", "b"], tokens("(a)\\12b"));
    }

    #[test]
    fn should_reject_truncated_prefixed_escapes() {
        assert_eq!(vec!["a"], tokens("a\\x4"));
        assert_eq!(vec!["a"], tokens("a\\u004"));
        assert_eq!(vec!["a"], tokens("a\\c"));
        assert_eq!(vec!["a", "\\x41"], tokens("a\\x41"));
    }

    #[test]
    fn should_tokenize_multibyte_characters() {
        assert_eq!(vec!["(?:0|的)", "+"], tokens("(?:0|的)+"));
        assert_eq!(vec!["的", "*"], tokens("的*"));
    }

    #[test]
    fn concatenated_tokens_should_reproduce_the_source() {
        for pattern in [
            "[A-Za-z_][A-Za-z0-9_]*",
            r"(\(\w\))+",
            "((0x|0X)[0-9a-fA-F]+)(u|U|l|L)*",
            "(?:0|的)+",
            "a+?b{2,4}\\1",
        ] {
            assert_eq!(pattern, tokens(pattern).concat(), "pattern `{}`", pattern);
        }
    }

    #[test]
    fn should_classify_by_leading_characters() {
        let expectations = [
            ("a", TokenKind::Char),
            (".", TokenKind::Char),
            ("[a-z]", TokenKind::Char),
            ("\\d", TokenKind::Char),
            ("\\12", TokenKind::Char),
            ("*", TokenKind::Quantifier),
            ("+?", TokenKind::Quantifier),
            ("{2,4}", TokenKind::Quantifier),
            ("|", TokenKind::Alternation),
            ("^", TokenKind::Assertion),
            ("$", TokenKind::Assertion),
            ("\\b", TokenKind::Assertion),
            ("\\B", TokenKind::Assertion),
            ("(?=ab)", TokenKind::Assertion),
            ("(?!ab)", TokenKind::Assertion),
            ("(?<=ab)", TokenKind::Assertion),
            ("(?<!ab)", TokenKind::Assertion),
            ("(ab)", TokenKind::Group),
            ("(?:ab)", TokenKind::Group),
            ("(?<name>ab)", TokenKind::Group),
            ("(?*)", TokenKind::Error),
        ];

        for (token, expected) in expectations {
            assert_eq!(expected, classify(token), "token `{}`", token);
        }
    }
}
