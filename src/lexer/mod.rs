//! Maximal-munch lexing: the DFA bank in [`automata`] stepped in lockstep
//! over the input buffer.

pub(crate) mod automata;
pub(crate) mod lookup;

use crate::token::{Token, TokenKind};
use automata::{Status, Step};

/// Outcome of a full lexing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexStatus {
    Ok,
    /// An input byte matched no automaton. The token vector still holds
    /// everything lexed so far plus one trailing [`TokenKind::Sentinel`]
    /// token spanning the offending byte.
    UnknownToken,
    /// The token buffer could not grow to hold another token.
    Oom,
}

#[derive(Debug, Clone, Copy)]
struct BankState {
    state: u8,
    alive: bool,
}

impl BankState {
    fn reset_all(slots: &mut [BankState; TokenKind::BANK_LEN]) {
        for slot in slots.iter_mut() {
            slot.state = 0;
            slot.alive = true;
        }
    }
}

/// Lex `input` in full. Always returns every token recognized before a
/// failure, alongside the status describing whether the pass fully
/// succeeded.
pub fn lex(input: &[u8]) -> (Vec<Token>, LexStatus) {
    let mut tokens = Vec::new();
    if tokens.try_reserve(input.len() / 2 + 2).is_err() {
        return (tokens, LexStatus::Oom);
    }
    tokens.push(Token::new(TokenKind::FBeg, 0, 0));

    let n = input.len();
    let mut prefix_begin = 0usize;
    let mut scan = 0usize;
    let mut bank = [BankState {
        state: 0,
        alive: true,
    }; TokenKind::BANK_LEN];
    // Tracks, for each automaton, whether it was in `Accept` status as of
    // the *last successfully stepped* byte (i.e. at position `scan`,
    // before attempting to extend the run to `scan + 1`).
    let mut accepting = [false; TokenKind::BANK_LEN];

    loop {
        if scan == n {
            // End of input: try to close out whatever run is pending.
            if scan > prefix_begin {
                match emit(&mut tokens, &accepting, prefix_begin, scan) {
                    Ok(()) => {}
                    Err(Emit::Oom) => return (tokens, LexStatus::Oom),
                    Err(Emit::NoAccept) => {
                        // Nothing ever accepted over this run (e.g. an
                        // unterminated string or block comment): the whole
                        // pending span is unrecognized, not just its first
                        // byte.
                        if push_unknown(&mut tokens, prefix_begin, scan).is_err() {
                            return (tokens, LexStatus::Oom);
                        }
                        return (tokens, LexStatus::UnknownToken);
                    }
                }
            }
            if tokens.try_reserve(1).is_err() {
                return (tokens, LexStatus::Oom);
            }
            tokens.push(Token::new(TokenKind::FEnd, n, n));
            return (tokens, LexStatus::Ok);
        }

        let byte = input[scan];
        let mut any_alive = false;
        let mut next_accepting = [false; TokenKind::BANK_LEN];
        for i in 0..TokenKind::BANK_LEN {
            if !bank[i].alive {
                continue;
            }
            let Step { status, next_state } = automata::BANK[i](bank[i].state, byte);
            match status {
                Status::Reject => {
                    bank[i].alive = false;
                }
                Status::Hungry => {
                    bank[i].state = next_state;
                    any_alive = true;
                }
                Status::Accept => {
                    bank[i].state = next_state;
                    any_alive = true;
                    next_accepting[i] = true;
                }
            }
        }

        if any_alive {
            scan += 1;
            accepting = next_accepting;
            continue;
        }

        // This byte extends nothing. Close out the run using what was
        // accepting as of `scan` (before this byte), if anything was.
        if scan > prefix_begin {
            match emit(&mut tokens, &accepting, prefix_begin, scan) {
                Ok(()) => {
                    prefix_begin = scan;
                    BankState::reset_all(&mut bank);
                    accepting = [false; TokenKind::BANK_LEN];
                    continue;
                }
                Err(Emit::Oom) => return (tokens, LexStatus::Oom),
                Err(Emit::NoAccept) => { /* fall through: truly nothing ever accepted */ }
            }
        }

        // Nothing accepting even at the very first byte of this run: the
        // byte at `scan` is unrecognized.
        if push_unknown(&mut tokens, scan, scan + 1).is_err() {
            return (tokens, LexStatus::Oom);
        }
        return (tokens, LexStatus::UnknownToken);
    }
}

enum Emit {
    Oom,
    NoAccept,
}

/// Picks the tie-break winner among automata accepting as of `end` and
/// pushes the resulting token spanning `begin..end`.
///
/// The winner is the *highest*-indexed accepting automaton, matching the
/// reference lexer's overwrite-while-scanning-ascending behavior; this is
/// what lets keywords (declared after `NAME`) preempt an identifier at a
/// tied length.
fn emit(
    tokens: &mut Vec<Token>,
    accepting: &[bool; TokenKind::BANK_LEN],
    begin: usize,
    end: usize,
) -> Result<(), Emit> {
    let mut winner = None;
    for i in 0..TokenKind::BANK_LEN {
        if accepting[i] {
            winner = Some(i);
        }
    }
    let Some(winner) = winner else {
        return Err(Emit::NoAccept);
    };
    if tokens.try_reserve(1).is_err() {
        return Err(Emit::Oom);
    }
    tokens.push(Token::new(automata::kind_at(winner), begin, end));
    Ok(())
}

fn push_unknown(tokens: &mut Vec<Token>, begin: usize, end: usize) -> Result<(), ()> {
    if tokens.try_reserve(1).is_err() {
        return Err(());
    }
    tokens.push(Token::new(TokenKind::Sentinel, begin, end));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, status) = lex(src.as_bytes());
        assert_eq!(status, LexStatus::Ok, "expected OK for {src:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_just_sentinels() {
        assert_eq!(kinds(""), vec![TokenKind::FBeg, TokenKind::FEnd]);
    }

    #[test]
    fn keyword_wins_over_name_at_tied_length() {
        assert_eq!(
            kinds("if"),
            vec![TokenKind::FBeg, TokenKind::Cond, TokenKind::FEnd]
        );
    }

    #[test]
    fn keyword_prefix_followed_by_ident_char_is_a_name() {
        assert_eq!(
            kinds("ifoo"),
            vec![TokenKind::FBeg, TokenKind::Name, TokenKind::FEnd]
        );
    }

    #[test]
    fn block_comment_survives_lone_star() {
        assert_eq!(
            kinds("/* a * b */"),
            vec![TokenKind::FBeg, TokenKind::Bcom, TokenKind::FEnd]
        );
    }

    #[test]
    fn unterminated_string_is_unknown_token() {
        let (tokens, status) = lex(b"\"abc");
        assert_eq!(status, LexStatus::UnknownToken);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Sentinel);
        // The unknown token spans the whole pending run, not just its
        // first byte -- the opening quote through the last unmatched byte.
        assert_eq!((last.begin, last.end), (0, 4));
    }

    #[test]
    fn sums_of_token_lengths_cover_whole_input() {
        let src = "x = 1 + 2 * 3; // trailing\n";
        let (tokens, status) = lex(src.as_bytes());
        assert_eq!(status, LexStatus::Ok);
        let covered: usize = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::FBeg | TokenKind::FEnd))
            .map(|t| t.len())
            .sum();
        assert_eq!(covered, src.len());
    }
}
