//! The operator-precedence shunting parser.
//!
//! Two stacks drive the parse: `ops` holds pending operators and `rpn` holds
//! finished subtrees in reverse-Polish order. Concatenation is implicit in a
//! pattern, so an `or_flag` tracks whether the previous lexeme was an
//! alternation; any atom arriving while the flag is down first pushes a
//! synthetic concatenation operator. Each operator class has a push policy
//! describing which pending operators it flushes into subtrees first.
//!
//! Any malformed input — stack underflow while binding, leftover operands,
//! an invalid `(?…)` sigil — yields `None`, which the builder turns into the
//! automaton that accepts nothing.

use crate::ast::AstNode;
use crate::lexer::{classify, Cursor, TokenKind};

/// Parses a pattern into its AST. `None` signals a malformed pattern.
///
/// # Example
///
/// ```
/// use rangex_compiler::lexer::TokenKind;
/// use rangex_compiler::parser::parse;
///
/// let ast = parse("ab|c").unwrap();
/// assert_eq!(TokenKind::Alternation, ast.kind());
/// assert_eq!(TokenKind::Concat, ast.left().unwrap().kind());
/// ```
pub fn parse(pattern: &str) -> Option<AstNode> {
    let mut ops: Vec<AstNode> = Vec::new();
    let mut rpn: Vec<AstNode> = Vec::new();
    let mut cursor = Cursor::new(pattern);
    let mut or_flag = true;

    while let Some(token) = cursor.next_token() {
        match classify(token) {
            TokenKind::Alternation => {
                if !push_or(&mut ops, &mut rpn) {
                    return None;
                }
                or_flag = true;
            }
            TokenKind::Quantifier => {
                if !push_quantifier(&mut ops, &mut rpn, token) {
                    return None;
                }
            }
            TokenKind::Char => {
                if !or_flag && !push_and(&mut ops, &mut rpn) {
                    return None;
                }
                rpn.push(AstNode::new(TokenKind::Char, token));
                or_flag = false;
            }
            TokenKind::Group => {
                if !or_flag && !push_and(&mut ops, &mut rpn) {
                    return None;
                }
                if let Some(interior) = token.strip_prefix("(?:") {
                    // non-capturing: splice the inner parse in directly
                    let subtree = parse(&interior[..interior.len() - 1])?;
                    rpn.push(subtree);
                } else {
                    rpn.push(AstNode::new(TokenKind::Group, capture_interior(token)));
                }
                or_flag = false;
            }
            TokenKind::Assertion => {
                if !or_flag && !push_and(&mut ops, &mut rpn) {
                    return None;
                }
                rpn.push(AstNode::new(TokenKind::Assertion, token));
                or_flag = false;
            }
            TokenKind::Concat | TokenKind::Error => return None,
        }
    }

    if !push_or(&mut ops, &mut rpn) {
        return None;
    }
    if rpn.len() == 1 {
        rpn.pop()
    } else {
        None
    }
}

/// The inner pattern of a capturing group token: the parentheses are
/// stripped, as is a `?<name>` sigil on a named capture.
fn capture_interior(token: &str) -> &str {
    let interior = &token[1..token.len() - 1];
    match interior.strip_prefix("?<") {
        Some(named) => match named.find('>') {
            Some(sigil_end) => &named[sigil_end + 1..],
            None => interior,
        },
        None => interior,
    }
}

/// Pops the top operator and binds its operands from `rpn`: two for
/// concatenation and alternation (right child first), one for a quantifier.
/// Underflow is a parse error.
fn bind(ops: &mut Vec<AstNode>, rpn: &mut Vec<AstNode>) -> bool {
    let Some(mut op) = ops.pop() else {
        return false;
    };

    match op.kind() {
        TokenKind::Concat | TokenKind::Alternation => {
            let right = rpn.pop();
            let left = rpn.pop();
            match (left, right) {
                (Some(left), Some(right)) => {
                    op.set_left(left);
                    op.set_right(right);
                }
                _ => return false,
            }
        }
        _ => match rpn.pop() {
            Some(operand) => op.set_left(operand),
            None => return false,
        },
    }

    rpn.push(op);
    true
}

/// Flushes every pending operator, then pushes an alternation operator.
fn push_or(ops: &mut Vec<AstNode>, rpn: &mut Vec<AstNode>) -> bool {
    while !ops.is_empty() {
        if !bind(ops, rpn) {
            return false;
        }
    }
    ops.push(AstNode::new(TokenKind::Alternation, ""));
    true
}

/// Flushes pending operators up to the nearest alternation, then pushes a
/// concatenation operator.
fn push_and(ops: &mut Vec<AstNode>, rpn: &mut Vec<AstNode>) -> bool {
    while let Some(top) = ops.last() {
        if top.kind() == TokenKind::Alternation {
            break;
        }
        if !bind(ops, rpn) {
            return false;
        }
    }
    ops.push(AstNode::new(TokenKind::Concat, ""));
    true
}

/// Flushes pending quantifiers only, then pushes the quantifier operator
/// carrying its raw text.
fn push_quantifier(ops: &mut Vec<AstNode>, rpn: &mut Vec<AstNode>, text: &str) -> bool {
    while let Some(top) = ops.last() {
        if matches!(top.kind(), TokenKind::Concat | TokenKind::Alternation) {
            break;
        }
        if !bind(ops, rpn) {
            return false;
        }
    }
    ops.push(AstNode::new(TokenKind::Quantifier, text));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_adjacent_atoms_into_concatenation() {
        let ast = parse("ab").unwrap();

        assert_eq!(TokenKind::Concat, ast.kind());
        assert_eq!("a", ast.left().unwrap().text());
        assert_eq!("b", ast.right().unwrap().text());
    }

    #[test]
    fn should_parse_alternation_below_concatenation() {
        let ast = parse("ab|c").unwrap();

        assert_eq!(TokenKind::Alternation, ast.kind());
        let left = ast.left().unwrap();
        assert_eq!(TokenKind::Concat, left.kind());
        assert_eq!("c", ast.right().unwrap().text());
    }

    #[test]
    fn should_bind_quantifiers_to_the_preceding_atom() {
        let ast = parse("ab*").unwrap();

        assert_eq!(TokenKind::Concat, ast.kind());
        let quantified = ast.right().unwrap();
        assert_eq!(TokenKind::Quantifier, quantified.kind());
        assert_eq!("*", quantified.text());
        assert_eq!("b", quantified.left().unwrap().text());
    }

    #[test]
    fn should_stack_repeated_quantifiers() {
        let ast = parse("a*+").unwrap();

        assert_eq!(TokenKind::Quantifier, ast.kind());
        assert_eq!("+", ast.text());
        let inner = ast.left().unwrap();
        assert_eq!(TokenKind::Quantifier, inner.kind());
        assert_eq!("*", inner.text());
    }

    #[test]
    fn should_keep_the_raw_lexeme_on_leaves() {
        let ast = parse("[a-c]{2,4}").unwrap();

        assert_eq!(TokenKind::Quantifier, ast.kind());
        assert_eq!("{2,4}", ast.text());
        assert_eq!("[a-c]", ast.left().unwrap().text());
    }

    #[test]
    fn should_strip_delimiters_from_capturing_groups() {
        let ast = parse("(a|b)").unwrap();

        assert_eq!(TokenKind::Group, ast.kind());
        assert_eq!("a|b", ast.text());
    }

    #[test]
    fn should_strip_the_name_sigil_from_named_captures() {
        let ast = parse("(?<digits>a+)").unwrap();

        assert_eq!(TokenKind::Group, ast.kind());
        assert_eq!("a+", ast.text());
    }

    #[test]
    fn should_splice_non_capturing_groups_inline() {
        let ast = parse("(?:ab)c").unwrap();

        // no group node survives: the interior tree is concatenated directly
        assert_eq!(TokenKind::Concat, ast.kind());
        assert_eq!(TokenKind::Concat, ast.left().unwrap().kind());
        assert_eq!("c", ast.right().unwrap().text());
    }

    #[test]
    fn should_keep_assertion_sigils_on_leaves() {
        let ast = parse("(?=ab)c").unwrap();

        assert_eq!(TokenKind::Concat, ast.kind());
        let assertion = ast.left().unwrap();
        assert_eq!(TokenKind::Assertion, assertion.kind());
        assert_eq!("(?=ab)", assertion.text());
    }

    #[test]
    fn should_reject_malformed_patterns() {
        assert_eq!(None, parse(""));
        assert_eq!(None, parse("|a"));
        assert_eq!(None, parse("*"));
        assert_eq!(None, parse("(?*)"));
        assert_eq!(None, parse("(ab"));
    }

    #[test]
    fn should_truncate_at_an_unmatched_closer() {
        // tokenization stops at `)`, so the parse covers only the prefix
        assert_eq!(parse("a"), parse("a)b"));
    }
}
