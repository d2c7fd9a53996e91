//! Shift-reduce parsing over the static grammar table in [`crate::grammar`].

pub mod node;

use crate::grammar::{Production, Term, TermKind, GRAMMAR};
use crate::limit::LimitTracker;
use crate::parser::node::{NonTerminal, Node};
use crate::token::{Token, TokenKind};

/// Outcome of a full parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted,
    Rejected,
    Oom,
}

pub struct ParseResult {
    pub tree: Option<Node>,
    pub outcome: ParseOutcome,
    /// One line per shift/reduce action, terminated by an `ACCEPT`/`REJECT`
    /// line, in the format used by the `Parsing` section of the report.
    pub diagnostics: Vec<String>,
}

/// Parse `tokens` (as produced by [`crate::lexer::lex`]) against `input`,
/// the buffer they were lexed from (needed to render token text into the
/// diagnostic trace). Trivia tokens are dropped before parsing begins --
/// the parser never shifts them and every lookahead check already treats
/// them as invisible, so filtering up front is equivalent to, and simpler
/// than, skipping them inline on every peek.
pub fn parse(tokens: &[Token], input: &[u8]) -> ParseResult {
    parse_with_limit(tokens, input, LimitTracker::default().limit)
}

pub fn parse_with_limit(tokens: &[Token], input: &[u8], recursion_limit: usize) -> ParseResult {
    let filtered: Vec<Token> = tokens
        .iter()
        .copied()
        .filter(|t| !t.kind.is_trivia())
        .collect();

    let mut stack: Vec<Node> = Vec::new();
    let mut diagnostics: Vec<String> = Vec::new();
    let mut limit = LimitTracker::new(recursion_limit);
    let mut idx = 0usize;

    macro_rules! oom_guard {
        ($reserve:expr) => {
            if $reserve.try_reserve(1).is_err() {
                return ParseResult {
                    tree: None,
                    outcome: ParseOutcome::Oom,
                    diagnostics,
                };
            }
        };
    }

    // Shifts `tok` (already known to be the token at `idx`) onto the stack:
    // bumps the recursion limit for `(`/`{`, rejects if it's now exceeded,
    // guards the push against OOM, and emits the `Shift` diagnostic line.
    // Shared between the ordinary end-of-reduce-loop shift and the
    // shift-pre gate's "shift the lookahead and retry" suppression path.
    macro_rules! shift_one {
        ($tok:expr) => {{
            let tok: Token = $tok;
            idx += 1;
            if matches!(tok.kind, TokenKind::Lpar | TokenKind::Lbrc) {
                limit.consume();
                if limit.limited() {
                    return ParseResult {
                        tree: None,
                        outcome: ParseOutcome::Rejected,
                        diagnostics,
                    };
                }
            }
            oom_guard!(stack);
            stack.push(Node::Leaf(tok));
            diagnostics.push(fmt_stack("Shift", &stack, input));
        }};
    }

    loop {
        loop {
            let lookahead = filtered.get(idx).copied();
            let mut applied = false;
            for prod in GRAMMAR {
                if let Some(size) = rule_match(&stack, prod.rhs) {
                    if shift_pre_suppresses(prod, &stack, size, lookahead) {
                        // Suppressing a reduce doesn't mean "try the next
                        // production" -- a lower-priority production could
                        // spuriously match the same stack top (e.g. `Uexp`
                        // matching the `+`/`-` leaf of a just-suppressed
                        // `Bexp`). Shift the lookahead immediately and
                        // restart the reduce scan from the first production,
                        // mirroring the reference's `goto try_reduce_again`.
                        let tok = lookahead.expect("suppression implies a lookahead token");
                        shift_one!(tok);
                        applied = true;
                        break;
                    }
                    oom_guard!(stack);
                    let start = stack.len() - size;
                    let children = stack.split_off(start);
                    stack.push(Node::Internal {
                        kind: prod.lhs,
                        children,
                    });
                    diagnostics.push(fmt_stack("Reduce", &stack, input));

                    if matches!(
                        prod.lhs,
                        NonTerminal::Pexp
                            | NonTerminal::Cond
                            | NonTerminal::Elif
                            | NonTerminal::Else
                            | NonTerminal::Dowh
                            | NonTerminal::Whil
                    ) {
                        limit.release();
                    }

                    apply_shift_post(prod.lhs, &mut stack, &mut idx, &filtered, input, &mut diagnostics);
                    applied = true;
                    break;
                }
            }
            if !applied {
                break;
            }
        }

        let Some(tok) = filtered.get(idx).copied() else {
            break;
        };
        shift_one!(tok);
    }

    let accepted = stack.len() == 1
        && matches!(
            stack.first(),
            Some(Node::Internal { kind: NonTerminal::Unit, .. })
        );

    if accepted {
        let line = format!("ACCEPT {}", render_stack(&stack, input));
        diagnostics.push(line);
        ParseResult {
            tree: stack.into_iter().next(),
            outcome: ParseOutcome::Accepted,
            diagnostics,
        }
    } else {
        let line = format!("REJECT {}", render_stack(&stack, input));
        diagnostics.push(line);
        ParseResult {
            tree: None,
            outcome: ParseOutcome::Rejected,
            diagnostics,
        }
    }
}

/// Matches `rhs` against the tail of `stack`, right-to-left. Returns the
/// number of stack nodes consumed on success. A `multi` term greedily
/// consumes as many matching stack nodes as it can (including zero).
fn rule_match(stack: &[Node], rhs: &[Term]) -> Option<usize> {
    let mut si = stack.len();
    let mut matched_any = false;

    for term in rhs.iter().rev() {
        if term.multi {
            while si > 0 && term_matches(term, &stack[si - 1]) {
                si -= 1;
                matched_any = true;
            }
        } else {
            if si == 0 || !term_matches(term, &stack[si - 1]) {
                return None;
            }
            si -= 1;
            matched_any = true;
        }
    }

    matched_any.then(|| stack.len() - si)
}

fn term_matches(term: &Term, node: &Node) -> bool {
    match term.kind {
        TermKind::Token(kind) => node.as_leaf().is_some_and(|t| t.kind == kind),
        TermKind::NonTerminal(nt) => node.as_internal().is_some_and(|(kind, _)| kind == nt),
        TermKind::BinOp => node.as_leaf().is_some_and(|t| t.kind.precedence().is_some()),
        TermKind::UnOp => node
            .as_leaf()
            .is_some_and(|t| matches!(t.kind, TokenKind::Plus | TokenKind::Mins | TokenKind::Nega)),
    }
}

/// The binary-precedence gate and the left-of-assignment demotion guards.
/// Returns `true` when the matched reduce must be held back in favor of
/// shifting the lookahead token first.
fn shift_pre_suppresses(
    prod: &Production,
    stack: &[Node],
    size: usize,
    lookahead: Option<Token>,
) -> bool {
    let Some(lookahead) = lookahead else {
        return false;
    };

    if prod.lhs == NonTerminal::Bexp {
        let op_index = stack.len() - size + 1;
        if let Some(op_tok) = stack.get(op_index).and_then(Node::as_leaf) {
            if let (Some(this_prec), Some(look_prec)) =
                (op_tok.kind.precedence(), lookahead.kind.precedence())
            {
                if look_prec < this_prec {
                    return true;
                }
            }
        }
    }

    if prod.lhs == NonTerminal::Atom
        && prod.rhs.len() == 1
        && matches!(prod.rhs[0].kind, TermKind::Token(TokenKind::Name))
        && matches!(lookahead.kind, TokenKind::Assn | TokenKind::Lbra)
    {
        return true;
    }

    if prod.lhs == NonTerminal::Expr
        && prod.rhs.len() == 1
        && matches!(prod.rhs[0].kind, TermKind::NonTerminal(NonTerminal::Aexp))
        && lookahead.kind == TokenKind::Assn
    {
        return true;
    }

    false
}

/// After reducing a `Cond`/`Elif`, immediately shift a following `elif`/
/// `else` so the whole chain stays contiguous on the stack for `Ctrl` to
/// reduce in one step.
fn apply_shift_post(
    lhs: NonTerminal,
    stack: &mut Vec<Node>,
    idx: &mut usize,
    filtered: &[Token],
    input: &[u8],
    diagnostics: &mut Vec<String>,
) {
    if !matches!(lhs, NonTerminal::Cond | NonTerminal::Elif) {
        return;
    }
    if let Some(next) = filtered.get(*idx).copied() {
        if matches!(next.kind, TokenKind::Elif | TokenKind::Else) {
            stack.push(Node::Leaf(next));
            *idx += 1;
            diagnostics.push(fmt_stack("Shift", stack, input));
        }
    }
}

fn fmt_stack(action: &str, stack: &[Node], input: &[u8]) -> String {
    format!("{action}: {}", render_stack(stack, input))
}

fn render_stack(stack: &[Node], input: &[u8]) -> String {
    let mut out = String::new();
    for (i, node) in stack.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match node {
            Node::Leaf(tok) => match tok.kind {
                TokenKind::FBeg => out.push('^'),
                TokenKind::FEnd => out.push('$'),
                _ => out.push_str(&String::from_utf8_lossy(tok.text(input))),
            },
            Node::Internal { kind, .. } => out.push_str(kind.label()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn parse_src(src: &str) -> ParseResult {
        let (tokens, status) = lex(src.as_bytes());
        assert_eq!(status, crate::lexer::LexStatus::Ok);
        parse(&tokens, src.as_bytes())
    }

    #[test]
    fn simple_assignment_is_accepted() {
        let result = parse_src("x = 1;");
        assert_eq!(result.outcome, ParseOutcome::Accepted);
    }

    #[test]
    fn double_assignment_is_rejected() {
        let result = parse_src("x = y = 1;");
        assert_eq!(result.outcome, ParseOutcome::Rejected);
    }

    #[test]
    fn array_assignment_parses_as_assn_over_aexp() {
        let result = parse_src("a[0] = 1;");
        assert_eq!(result.outcome, ParseOutcome::Accepted);
        let (kind, children) = result.tree.as_ref().unwrap().as_internal().unwrap();
        assert_eq!(kind, NonTerminal::Unit);
        let (stmt_kind, stmt_children) = children[1].as_internal().unwrap();
        assert_eq!(stmt_kind, NonTerminal::Stmt);
        let (assn_kind, assn_children) = stmt_children[0].as_internal().unwrap();
        assert_eq!(assn_kind, NonTerminal::Assn);
        assert!(matches!(
            assn_children[0].as_internal(),
            Some((NonTerminal::Aexp, _))
        ));
    }

    #[test]
    fn if_elif_else_chain_accepts() {
        let result = parse_src(
            "if x == 1 { print 1; } elif x == 2 { print 2; } else { print 3; }",
        );
        assert_eq!(result.outcome, ParseOutcome::Accepted);
    }

    /// A tighter-binding operator following a suppressed `Bexp` reduce must
    /// be shifted, not left for a later production to accidentally match
    /// (e.g. `Uexp`'s `+`/`-` term matching the just-suppressed operator
    /// leaf). Regression test for the case where `print 2 + 3 * 4;` was
    /// rejected instead of parsed as `2 + (3 * 4)`.
    #[test]
    fn tighter_operator_after_suppressed_reduce_still_accepts() {
        let result = parse_src("print 2 + 3 * 4;");
        assert_eq!(result.outcome, ParseOutcome::Accepted);
    }
}
