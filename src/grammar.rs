//! The static grammar table consulted by the shift-reduce parser, plus the
//! operator precedence table used by its lookahead gate.
//!
//! This is a direct transcription of the reference parser's declarative
//! `grammar[]` table: one row per concrete right-hand side, matched
//! right-to-left against the parse stack in the order declared here.
//! Declaration order is itself meaningful -- the parser commits to the
//! first row (in this order) whose right-hand side matches.

use crate::parser::node::NonTerminal;
use crate::token::TokenKind;

/// One position in a production's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TermKind {
    Token(TokenKind),
    NonTerminal(NonTerminal),
    /// Matches any of the 13 binary operator token kinds (the `OP` in
    /// `Bexp -> Expr OP Expr`).
    BinOp,
    /// Matches `+`, `-` or `!` (the prefix operator in `Uexp`).
    UnOp,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Term {
    pub(crate) kind: TermKind,
    /// May match the term one-or-more times, greedily, when true.
    pub(crate) multi: bool,
}

const fn tok(k: TokenKind) -> Term {
    Term {
        kind: TermKind::Token(k),
        multi: false,
    }
}

const fn nt(n: NonTerminal) -> Term {
    Term {
        kind: TermKind::NonTerminal(n),
        multi: false,
    }
}

const fn nt_multi(n: NonTerminal) -> Term {
    Term {
        kind: TermKind::NonTerminal(n),
        multi: true,
    }
}

const fn bin_op() -> Term {
    Term {
        kind: TermKind::BinOp,
        multi: false,
    }
}

const fn un_op() -> Term {
    Term {
        kind: TermKind::UnOp,
        multi: false,
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Production {
    pub(crate) lhs: NonTerminal,
    pub(crate) rhs: &'static [Term],
}

use NonTerminal::*;
use TokenKind as K;

pub(crate) static GRAMMAR: &[Production] = &[
    Production {
        lhs: Unit,
        rhs: &[tok(K::FBeg), nt_multi(Stmt), tok(K::FEnd)],
    },
    Production {
        lhs: Stmt,
        rhs: &[nt(Assn)],
    },
    Production {
        lhs: Stmt,
        rhs: &[nt(Prnt)],
    },
    Production {
        lhs: Stmt,
        rhs: &[nt(Ctrl)],
    },
    Production {
        lhs: Assn,
        rhs: &[tok(K::Name), tok(K::Assn), nt(Expr), tok(K::Scol)],
    },
    Production {
        lhs: Assn,
        rhs: &[nt(Aexp), tok(K::Assn), nt(Expr), tok(K::Scol)],
    },
    Production {
        lhs: Prnt,
        rhs: &[tok(K::Prnt), nt(Expr), tok(K::Scol)],
    },
    Production {
        lhs: Prnt,
        rhs: &[tok(K::Prnt), tok(K::Strl), nt(Expr), tok(K::Scol)],
    },
    Production {
        lhs: Ctrl,
        rhs: &[nt(Cond), nt_multi(Elif)],
    },
    Production {
        lhs: Ctrl,
        rhs: &[nt(Cond), nt_multi(Elif), nt(Else)],
    },
    Production {
        lhs: Ctrl,
        rhs: &[nt(Dowh)],
    },
    Production {
        lhs: Ctrl,
        rhs: &[nt(Whil)],
    },
    Production {
        lhs: Cond,
        rhs: &[
            tok(K::Cond),
            nt(Expr),
            tok(K::Lbrc),
            nt_multi(Stmt),
            tok(K::Rbrc),
        ],
    },
    Production {
        lhs: Elif,
        rhs: &[
            tok(K::Elif),
            nt(Expr),
            tok(K::Lbrc),
            nt_multi(Stmt),
            tok(K::Rbrc),
        ],
    },
    Production {
        lhs: Else,
        rhs: &[tok(K::Else), tok(K::Lbrc), nt_multi(Stmt), tok(K::Rbrc)],
    },
    Production {
        lhs: Dowh,
        rhs: &[
            tok(K::Dowh),
            tok(K::Lbrc),
            nt_multi(Stmt),
            tok(K::Rbrc),
            tok(K::Whil),
            nt(Expr),
            tok(K::Scol),
        ],
    },
    Production {
        lhs: Whil,
        rhs: &[
            tok(K::Whil),
            nt(Expr),
            tok(K::Lbrc),
            nt_multi(Stmt),
            tok(K::Rbrc),
        ],
    },
    Production {
        lhs: Atom,
        rhs: &[tok(K::Name)],
    },
    Production {
        lhs: Atom,
        rhs: &[tok(K::Nmbr)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Atom)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Pexp)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Bexp)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Uexp)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Texp)],
    },
    Production {
        lhs: Expr,
        rhs: &[nt(Aexp)],
    },
    Production {
        lhs: Pexp,
        rhs: &[tok(K::Lpar), nt(Expr), tok(K::Rpar)],
    },
    Production {
        lhs: Bexp,
        rhs: &[nt(Expr), bin_op(), nt(Expr)],
    },
    Production {
        lhs: Uexp,
        rhs: &[un_op(), nt(Expr)],
    },
    Production {
        lhs: Texp,
        rhs: &[nt(Expr), tok(K::Ques), nt(Expr), tok(K::Coln), nt(Expr)],
    },
    Production {
        lhs: Aexp,
        rhs: &[tok(K::Name), tok(K::Lbra), nt(Expr), tok(K::Rbra)],
    },
];

/// Operator precedence: lower number binds tighter. A direct transcription
/// of the reference `preced[]` array, indexed here by `TokenKind` instead
/// of by `token - token_EQUL`.
pub(crate) fn precedence(kind: TokenKind) -> Option<u8> {
    kind.precedence()
}
