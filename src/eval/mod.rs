//! Tree-walking evaluator: direct interpretation of the parse tree built by
//! [`crate::parser::parse`], with signed 32-bit integer values and the flat
//! [`varstore::VarStore`] as the only storage.
//!
//! Grounded directly on the reference `run.c`: statement dispatch, the
//! `if`/`elif`/`else` chain walk, the do/while and while loops, and every
//! expression evaluator (`eval_atom`, `eval_pexp`, `eval_bexp`, `eval_uexp`,
//! `eval_texp`, `eval_aexp`) mirror that file's control flow one-for-one.
//! Arithmetic uses wrapping ops rather than the reference's plain `int`
//! overflow (which is undefined behavior in C); this crate keeps the
//! observable wraparound without the UB.

mod varstore;

use crate::limit::LimitTracker;
use crate::parser::node::{NonTerminal, Node};
use crate::token::{Token, TokenKind};
use varstore::VarStore;

/// The output of a full evaluation: one line per `print` statement or
/// runtime warning, in the exact order they were produced, matching the
/// reference's single interleaved output stream.
pub struct EvalResult {
    pub lines: Vec<String>,
}

/// Evaluate `tree` (the root `Unit` node) against `input`, using the
/// default recursion limit.
pub fn evaluate(tree: &Node, input: &[u8]) -> EvalResult {
    evaluate_with_limit(tree, input, LimitTracker::default().limit)
}

/// As [`evaluate`], but with an explicit recursion limit for the expression
/// and nested-block walker (see [`crate::limit::LimitTracker`]).
pub fn evaluate_with_limit(tree: &Node, input: &[u8], recursion_limit: usize) -> EvalResult {
    let mut walker = Walker {
        input,
        store: VarStore::new(),
        limit: LimitTracker::new(recursion_limit),
        lines: Vec::new(),
    };
    walker.run_unit(tree);
    EvalResult {
        lines: walker.lines,
    }
}

struct Walker<'a> {
    input: &'a [u8],
    store: VarStore<'a>,
    limit: LimitTracker,
    lines: Vec<String>,
}

fn internal(node: &Node) -> (NonTerminal, &[Node]) {
    node.as_internal()
        .expect("evaluator walked a leaf where an internal node was expected")
}

fn leaf(node: &Node) -> Token {
    node.as_leaf()
        .expect("evaluator walked an internal node where a leaf was expected")
}

impl<'a> Walker<'a> {
    fn text(&self, token: Token) -> &'a [u8] {
        token.text(self.input)
    }

    fn warn(&mut self, message: &str) {
        self.lines.push(format!("warn: {message}"));
    }

    /// `Unit -> FBEG Stmt+ FEND`: run every `Stmt` child, skipping the two
    /// sentinel leaves at either end.
    fn run_unit(&mut self, unit: &Node) {
        let (kind, children) = internal(unit);
        debug_assert_eq!(kind, NonTerminal::Unit);
        for stmt in &children[1..children.len() - 1] {
            self.run_stmt(stmt);
        }
    }

    fn run_stmt(&mut self, stmt: &Node) {
        let (kind, children) = internal(stmt);
        debug_assert_eq!(kind, NonTerminal::Stmt);
        let (inner_kind, _) = internal(&children[0]);
        match inner_kind {
            NonTerminal::Assn => self.run_assn(&children[0]),
            NonTerminal::Prnt => self.run_prnt(&children[0]),
            NonTerminal::Ctrl => self.run_ctrl(&children[0]),
            other => unreachable!("Stmt child was {other:?}"),
        }
    }

    /// `Assn -> NAME '=' Expr ';'` or `Assn -> Aexp '=' Expr ';'`.
    ///
    /// The index (for the array form) is evaluated before the right-hand
    /// side, matching the reference's order of evaluation.
    fn run_assn(&mut self, assn: &Node) {
        let (_, children) = internal(assn);

        let (name, index) = match children[0].as_internal() {
            Some((NonTerminal::Aexp, aexp_children)) => {
                let name = self.text(leaf(&aexp_children[0]));
                let index = self.eval_expr(&aexp_children[2]);
                (name, index)
            }
            _ => (self.text(leaf(&children[0])), 0),
        };

        let value = self.eval_expr(&children[2]);

        if let Err(warning) = self.store.write(name, index, value) {
            self.lines.push(warning.report_line().to_string());
        }
    }

    /// `Prnt -> 'print' Expr ';'` or `Prnt -> 'print' STRL Expr ';'`.
    fn run_prnt(&mut self, prnt: &Node) {
        let (_, children) = internal(prnt);
        if children.len() == 3 {
            let value = self.eval_expr(&children[1]);
            self.lines.push(value.to_string());
        } else {
            let strl = leaf(&children[1]);
            let text = self.text(strl);
            // Strip the surrounding quotes the lexer included in the token.
            let prefix = String::from_utf8_lossy(&text[1..text.len() - 1]);
            let value = self.eval_expr(&children[2]);
            self.lines.push(format!("{prefix}{value}"));
        }
    }

    fn run_ctrl(&mut self, ctrl: &Node) {
        let (_, children) = internal(ctrl);
        let (head_kind, _) = internal(&children[0]);
        match head_kind {
            NonTerminal::Cond => self.run_cond_chain(children),
            NonTerminal::Dowh => self.run_dowh(&children[0]),
            NonTerminal::Whil => self.run_whil(&children[0]),
            other => unreachable!("Ctrl child was {other:?}"),
        }
    }

    /// `Cond Elif* Else?`: evaluate `if`, then each `elif` in order, falling
    /// through to `else` (if present) when nothing matched.
    fn run_cond_chain(&mut self, children: &[Node]) {
        let cond = &children[0];
        let (_, cond_children) = internal(cond);
        if self.eval_expr(&cond_children[1]) != 0 {
            self.run_block(body_between(cond_children, 3, 1));
            return;
        }

        for branch in &children[1..] {
            match internal(branch) {
                (NonTerminal::Elif, elif_children) => {
                    if self.eval_expr(&elif_children[1]) != 0 {
                        self.run_block(body_between(elif_children, 3, 1));
                        return;
                    }
                }
                (NonTerminal::Else, else_children) => {
                    self.run_block(body_between(else_children, 2, 1));
                    return;
                }
                (other, _) => unreachable!("Ctrl tail child was {other:?}"),
            }
        }
    }

    fn run_dowh(&mut self, dowh: &Node) {
        let (_, children) = internal(dowh);
        let body = body_between(children, 2, 4);
        let cond = &children[children.len() - 2];
        loop {
            self.run_block(body);
            if self.eval_expr(cond) == 0 {
                break;
            }
        }
    }

    fn run_whil(&mut self, whil: &Node) {
        let (_, children) = internal(whil);
        let cond = &children[1];
        let body = body_between(children, 3, 1);
        while self.eval_expr(cond) != 0 {
            self.run_block(body);
        }
    }

    /// Run a loop/branch body, bounding nesting depth the same way the
    /// parser already bounds `{`-nesting at parse time; this is a second,
    /// independent safety net rather than load-bearing (a tree this deep
    /// would already have been rejected before evaluation started).
    fn run_block(&mut self, stmts: &[Node]) {
        self.limit.consume();
        if self.limit.limited() {
            self.warn("nesting depth exceeded, skipping block");
            self.limit.release();
            return;
        }
        for stmt in stmts {
            self.run_stmt(stmt);
        }
        self.limit.release();
    }

    fn eval_expr(&mut self, expr: &Node) -> i32 {
        self.limit.consume();
        if self.limit.limited() {
            self.warn("expression exceeded recursion limit");
            self.limit.release();
            return 0;
        }
        let (kind, children) = internal(expr);
        debug_assert_eq!(kind, NonTerminal::Expr);
        let value = match internal(&children[0]) {
            (NonTerminal::Atom, atom_children) => self.eval_atom(atom_children),
            (NonTerminal::Pexp, pexp_children) => self.eval_expr(&pexp_children[1]),
            (NonTerminal::Bexp, bexp_children) => self.eval_bexp(bexp_children),
            (NonTerminal::Uexp, uexp_children) => self.eval_uexp(uexp_children),
            (NonTerminal::Texp, texp_children) => self.eval_texp(texp_children),
            (NonTerminal::Aexp, aexp_children) => self.eval_aexp(aexp_children),
            (other, _) => unreachable!("Expr child was {other:?}"),
        };
        self.limit.release();
        value
    }

    fn eval_atom(&mut self, children: &[Node]) -> i32 {
        let token = leaf(&children[0]);
        match token.kind {
            TokenKind::Name => match self.store.read_scalar(self.text(token)) {
                Ok(value) => value,
                Err(warning) => {
                    let message = warning.message().to_string();
                    self.warn(&message);
                    0
                }
            },
            TokenKind::Nmbr => parse_nmbr(self.text(token)),
            other => unreachable!("Atom leaf was {other:?}"),
        }
    }

    fn eval_bexp(&mut self, children: &[Node]) -> i32 {
        let left = self.eval_expr(&children[0]);
        let right = self.eval_expr(&children[2]);
        let op = leaf(&children[1]).kind;
        match op {
            TokenKind::Plus => left.wrapping_add(right),
            TokenKind::Mins => left.wrapping_sub(right),
            TokenKind::Mult => left.wrapping_mul(right),
            TokenKind::Divi => {
                if right == 0 {
                    self.warn("prevented attempt to divide by zero");
                    0
                } else {
                    left.wrapping_div(right)
                }
            }
            TokenKind::Modu => {
                if right == 0 {
                    self.warn("prevented attempt to compute a remainder by zero");
                    0
                } else {
                    left.wrapping_rem(right)
                }
            }
            TokenKind::Equl => (left == right) as i32,
            TokenKind::Neql => (left != right) as i32,
            TokenKind::Lthn => (left < right) as i32,
            TokenKind::Gthn => (left > right) as i32,
            TokenKind::Lteq => (left <= right) as i32,
            TokenKind::Gteq => (left >= right) as i32,
            // Non-short-circuiting by design: both operands are always
            // evaluated above, matching the reference (see DESIGN.md).
            TokenKind::Conj => ((left != 0) && (right != 0)) as i32,
            TokenKind::Disj => ((left != 0) || (right != 0)) as i32,
            other => unreachable!("Bexp operator was {other:?}"),
        }
    }

    fn eval_uexp(&mut self, children: &[Node]) -> i32 {
        let op = leaf(&children[0]).kind;
        match op {
            TokenKind::Plus => self.eval_expr(&children[1]),
            TokenKind::Mins => self.eval_expr(&children[1]).wrapping_neg(),
            TokenKind::Nega => (self.eval_expr(&children[1]) == 0) as i32,
            other => unreachable!("Uexp operator was {other:?}"),
        }
    }

    fn eval_texp(&mut self, children: &[Node]) -> i32 {
        if self.eval_expr(&children[0]) != 0 {
            self.eval_expr(&children[2])
        } else {
            self.eval_expr(&children[4])
        }
    }

    fn eval_aexp(&mut self, children: &[Node]) -> i32 {
        let name = self.text(leaf(&children[0]));
        let index = self.eval_expr(&children[2]);
        match self.store.read_index(name, index) {
            Ok(value) => value,
            Err(warning) => {
                let message = warning.message().to_string();
                self.warn(&message);
                0
            }
        }
    }
}

/// Slices out a block body's `Stmt` children given how many fixed leaves
/// bracket it on each side (e.g. `if`, the condition `Expr` and `{` before
/// the body of a `Cond`, and `}` after it).
fn body_between(children: &[Node], prefix: usize, suffix: usize) -> &[Node] {
    &children[prefix..children.len() - suffix]
}

/// Parses a `NMBR` token's decimal digits the way the reference does --
/// manual ASCII-to-integer conversion -- but with wrapping arithmetic
/// instead of relying on C's (undefined) signed overflow behavior.
fn parse_nmbr(digits: &[u8]) -> i32 {
    let mut result: i32 = 0;
    for &byte in digits {
        result = result
            .wrapping_mul(10)
            .wrapping_add((byte - b'0') as i32);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::{parse, ParseOutcome};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> Vec<String> {
        let (tokens, lex_status) = lex(src.as_bytes());
        assert_eq!(lex_status, crate::lexer::LexStatus::Ok);
        let result = parse(&tokens, src.as_bytes());
        assert_eq!(result.outcome, ParseOutcome::Accepted);
        evaluate(result.tree.as_ref().unwrap(), src.as_bytes()).lines
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(run("print 2 + 3 * 4;"), vec!["14"]);
    }

    #[test]
    fn variables() {
        assert_eq!(run("x = 10; y = x - 3; print y;"), vec!["7"]);
    }

    #[test]
    fn arrays() {
        assert_eq!(
            run("a[0] = 5; a[1] = 7; print a[0] + a[1];"),
            vec!["12"]
        );
    }

    #[test]
    fn if_elif_else() {
        assert_eq!(
            run("x = 2; if x == 1 { print 1; } elif x == 2 { print 2; } else { print 3; }"),
            vec!["2"]
        );
    }

    #[test]
    fn while_loop() {
        assert_eq!(
            run("i = 0; s = 0; while i < 5 { s = s + i; i = i + 1; } print s;"),
            vec!["10"]
        );
    }

    #[test]
    fn divide_by_zero_is_a_warning_then_zero() {
        assert_eq!(
            run("print 10 / 0;"),
            vec!["warn: prevented attempt to divide by zero", "0"]
        );
    }

    #[test]
    fn do_while_runs_body_at_least_once() {
        assert_eq!(run("i = 0; do { print i; i = i + 1; } while i < 3;"), vec!["0", "1", "2"]);
    }

    #[test]
    fn print_with_string_prefix() {
        assert_eq!(run(r#"print "total: " 5;"#), vec!["total: 5"]);
    }

    #[test]
    fn undefined_variable_warns_and_yields_zero() {
        assert_eq!(
            run("print x;"),
            vec!["warn: access to undefined variable", "0"]
        );
    }

    #[test]
    fn ternary_short_circuits_to_one_branch() {
        assert_eq!(run("print 1 ? 7 : 99;"), vec!["7"]);
        assert_eq!(run("print 0 ? 7 : 99;"), vec!["99"]);
    }

    #[test]
    fn logical_and_or_are_numeric() {
        assert_eq!(run("print 1 && 0;"), vec!["0"]);
        assert_eq!(run("print 1 || 0;"), vec!["1"]);
    }

    #[test]
    fn nested_while_and_if_share_the_same_varstore() {
        let src = indoc! {"
            total = 0;
            i = 0;
            while i < 4 {
                if i % 2 == 0 {
                    total = total + i;
                } else {
                    total = total - 1;
                }
                i = i + 1;
            }
            print total;
        "};
        // i = 0: +0, i = 1: -1, i = 2: +2, i = 3: -1 => 0
        assert_eq!(run(src), vec!["0"]);
    }

    #[test]
    fn negative_array_write_warns_with_lowercase_prefix_and_drops_the_write() {
        assert_eq!(
            run("a[-1] = 5; print a[0];"),
            vec![
                "warn: negative array offset",
                "warn: access to undefined array",
                "0"
            ]
        );
    }
}
