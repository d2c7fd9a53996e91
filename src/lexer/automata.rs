//! The DFA bank: one tiny automaton per [`TokenKind`], stepped in lockstep
//! by [`super::lex`].
//!
//! Each automaton is a `fn(state, byte) -> Step`. `state` is opaque to the
//! driver and starts at `0` for every fresh token attempt; an automaton may
//! use it however it likes (most only need one or two bits). This mirrors
//! the reference lexer's `token_funcs[token_COUNT]` array of function
//! pointers, one automaton per token kind, rather than a single hand-fused
//! state machine.

use crate::lexer::lookup::{is_ident_continue, is_namestart};
use crate::token::TokenKind;

/// Status of one automaton after consuming a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    /// The prefix consumed so far (including this byte) is a complete,
    /// acceptable token of this kind.
    Accept,
    /// Not yet acceptable, but not dead either; needs more input.
    Hungry,
    /// This automaton can never accept the current prefix.
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub(crate) status: Status,
    pub(crate) next_state: u8,
}

impl Step {
    const fn accept(next_state: u8) -> Self {
        Step {
            status: Status::Accept,
            next_state,
        }
    }
    const fn hungry(next_state: u8) -> Self {
        Step {
            status: Status::Hungry,
            next_state,
        }
    }
    const fn reject() -> Self {
        Step {
            status: Status::Reject,
            next_state: 0,
        }
    }
}

pub(crate) type Automaton = fn(state: u8, byte: u8) -> Step;

/// Generates a literal-match automaton: accepts once every byte of `$lit`
/// has been matched in order, hungry while a proper prefix has matched,
/// reject otherwise. Mirrors the reference's `TOKEN_DEFINE_1`..`TOKEN_DEFINE_5`
/// macros, one per literal length.
macro_rules! literal_automaton {
    ($name:ident, $lit:expr) => {
        fn $name(state: u8, byte: u8) -> Step {
            const LIT: &[u8] = $lit;
            let state = state as usize;
            if state < LIT.len() && byte == LIT[state] {
                let next = state + 1;
                if next == LIT.len() {
                    Step::accept(next as u8)
                } else {
                    Step::hungry(next as u8)
                }
            } else {
                Step::reject()
            }
        }
    };
}

literal_automaton!(lpar, b"(");
literal_automaton!(rpar, b")");
literal_automaton!(lbra, b"[");
literal_automaton!(rbra, b"]");
literal_automaton!(lbrc, b"{");
literal_automaton!(rbrc, b"}");
literal_automaton!(cond, b"if");
literal_automaton!(elif, b"elif");
literal_automaton!(else_, b"else");
literal_automaton!(dowh, b"do");
literal_automaton!(whil, b"while");
literal_automaton!(assn, b"=");
literal_automaton!(equl, b"==");
literal_automaton!(neql, b"!=");
literal_automaton!(lthn, b"<");
literal_automaton!(gthn, b">");
literal_automaton!(lteq, b"<=");
literal_automaton!(gteq, b">=");
literal_automaton!(conj, b"&&");
literal_automaton!(disj, b"||");
literal_automaton!(plus, b"+");
literal_automaton!(mins, b"-");
literal_automaton!(mult, b"*");
literal_automaton!(divi, b"/");
literal_automaton!(modu, b"%");
literal_automaton!(nega, b"!");
literal_automaton!(prnt, b"print");
literal_automaton!(scol, b";");
literal_automaton!(ques, b"?");
literal_automaton!(coln, b":");

fn name(state: u8, byte: u8) -> Step {
    if state == 0 {
        if is_namestart(byte) {
            Step::accept(1)
        } else {
            Step::reject()
        }
    } else if is_ident_continue(byte) {
        Step::accept(1)
    } else {
        Step::reject()
    }
}

fn nmbr(_state: u8, byte: u8) -> Step {
    if byte.is_ascii_digit() {
        Step::accept(0)
    } else {
        Step::reject()
    }
}

/// `0`: expecting the opening quote. `1`: inside the string body (hungry
/// until the closing quote). `2`: already closed; any further byte kills it
/// (maximal munch has nothing left to gain from this automaton).
fn strl(state: u8, byte: u8) -> Step {
    match state {
        0 => {
            if byte == b'"' {
                Step::hungry(1)
            } else {
                Step::reject()
            }
        }
        1 => {
            if byte == b'"' {
                Step::accept(2)
            } else {
                Step::hungry(1)
            }
        }
        _ => Step::reject(),
    }
}

fn wspc(_state: u8, byte: u8) -> Step {
    if matches!(byte, b' ' | b'\t' | b'\r' | b'\n') {
        Step::accept(0)
    } else {
        Step::reject()
    }
}

/// `//` followed by anything up to and including the first line terminator.
fn lcom(state: u8, byte: u8) -> Step {
    match state {
        0 => {
            if byte == b'/' {
                Step::hungry(1)
            } else {
                Step::reject()
            }
        }
        1 => {
            if byte == b'/' {
                Step::hungry(2)
            } else {
                Step::reject()
            }
        }
        2 => {
            if byte == b'\n' || byte == b'\r' {
                Step::accept(3)
            } else {
                Step::hungry(2)
            }
        }
        _ => Step::reject(),
    }
}

/// `/* ... */`; a `*` not followed by `/` falls back into the comment body
/// rather than closing.
fn bcom(state: u8, byte: u8) -> Step {
    match state {
        0 => {
            if byte == b'/' {
                Step::hungry(1)
            } else {
                Step::reject()
            }
        }
        1 => {
            if byte == b'*' {
                Step::hungry(2)
            } else {
                Step::reject()
            }
        }
        2 => {
            if byte == b'*' {
                Step::hungry(3)
            } else {
                Step::hungry(2)
            }
        }
        3 => {
            if byte == b'/' {
                Step::accept(4)
            } else if byte == b'*' {
                Step::hungry(3)
            } else {
                Step::hungry(2)
            }
        }
        _ => Step::reject(),
    }
}

/// The bank, indexed by `TokenKind as usize` (`Name..=Coln`).
pub(crate) const BANK: [Automaton; TokenKind::BANK_LEN] = [
    name, nmbr, strl, wspc, lcom, bcom, lpar, rpar, lbra, rbra, lbrc, rbrc, cond, elif, else_,
    dowh, whil, assn, equl, neql, lthn, gthn, lteq, gteq, conj, disj, plus, mins, mult, divi,
    modu, nega, prnt, scol, ques, coln,
];

pub(crate) fn kind_at(index: usize) -> TokenKind {
    // Safety net for the const array above: indices must line up with the
    // `TokenKind` discriminants `Name..=Coln`, checked once in tests.
    const KINDS: [TokenKind; TokenKind::BANK_LEN] = [
        TokenKind::Name,
        TokenKind::Nmbr,
        TokenKind::Strl,
        TokenKind::Wspc,
        TokenKind::Lcom,
        TokenKind::Bcom,
        TokenKind::Lpar,
        TokenKind::Rpar,
        TokenKind::Lbra,
        TokenKind::Rbra,
        TokenKind::Lbrc,
        TokenKind::Rbrc,
        TokenKind::Cond,
        TokenKind::Elif,
        TokenKind::Else,
        TokenKind::Dowh,
        TokenKind::Whil,
        TokenKind::Assn,
        TokenKind::Equl,
        TokenKind::Neql,
        TokenKind::Lthn,
        TokenKind::Gthn,
        TokenKind::Lteq,
        TokenKind::Gteq,
        TokenKind::Conj,
        TokenKind::Disj,
        TokenKind::Plus,
        TokenKind::Mins,
        TokenKind::Mult,
        TokenKind::Divi,
        TokenKind::Modu,
        TokenKind::Nega,
        TokenKind::Prnt,
        TokenKind::Scol,
        TokenKind::Ques,
        TokenKind::Coln,
    ];
    KINDS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_at_matches_discriminants() {
        for i in 0..TokenKind::BANK_LEN {
            assert_eq!(kind_at(i) as usize, i);
        }
    }

    #[test]
    fn literal_automaton_rejects_mismatch() {
        assert_eq!(lpar(0, b'x').status, Status::Reject);
        assert_eq!(lpar(0, b'(').status, Status::Accept);
    }

    #[test]
    fn keyword_and_name_both_accept_on_prefix() {
        // "if" and NAME both accept after 'i','f' -- disambiguated by the
        // driver's tie-break, not by the automata themselves.
        assert_eq!(cond(0, b'i').status, Status::Hungry);
        assert_eq!(cond(1, b'f').status, Status::Accept);
        assert_eq!(name(0, b'i').status, Status::Accept);
        assert_eq!(name(1, b'f').status, Status::Accept);
    }
}
