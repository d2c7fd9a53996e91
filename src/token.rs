//! Token kinds and the token record produced by the lexer.
//!
//! The enumeration order here is load-bearing: the lexer's maximal-munch
//! tie-break (see [`crate::lexer`]) picks the *highest*-indexed automaton
//! still accepting when two or more tie on length, so keywords must be
//! declared after [`TokenKind::Name`] for `if`/`while`/`print`/... to win
//! over an otherwise-matching identifier.

/// The kind of a single token.
///
/// Variants up to and including [`TokenKind::Coln`] each have a
/// corresponding entry in the lexer's automaton bank
/// (see [`crate::lexer::automata::BANK`]); [`TokenKind::Sentinel`],
/// [`TokenKind::FBeg`] and [`TokenKind::FEnd`] do not participate in
/// lexing and are only ever constructed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    Name = 0,
    Nmbr,
    Strl,
    Wspc,
    Lcom,
    Bcom,
    Lpar,
    Rpar,
    Lbra,
    Rbra,
    Lbrc,
    Rbrc,
    Cond,
    Elif,
    Else,
    Dowh,
    Whil,
    Assn,
    Equl,
    Neql,
    Lthn,
    Gthn,
    Lteq,
    Gteq,
    Conj,
    Disj,
    Plus,
    Mins,
    Mult,
    Divi,
    Modu,
    Nega,
    Prnt,
    Scol,
    Ques,
    Coln,
    /// Not produced by the lexer bank; used as the kind of the single
    /// error token appended when an input byte matches nothing.
    Sentinel,
    /// Synthetic marker prepended to every token stream.
    FBeg,
    /// Synthetic marker appended to every successfully lexed token stream.
    FEnd,
}

impl TokenKind {
    /// Number of real entries in the automaton bank (`Name..=Coln`).
    pub(crate) const BANK_LEN: usize = TokenKind::Coln as usize + 1;

    /// Trivia tokens are recognized by the lexer but never shifted onto
    /// the parser's stack.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Wspc | TokenKind::Lcom | TokenKind::Bcom)
    }

    /// Whether this kind is one of the 13 binary operators that
    /// participate in the precedence table.
    pub fn precedence(self) -> Option<u8> {
        use TokenKind::*;
        Some(match self {
            Equl | Neql => 4,
            Lthn | Gthn | Lteq | Gteq => 3,
            Conj => 5,
            Disj => 6,
            Plus | Mins => 2,
            Mult | Divi | Modu => 1,
            _ => return None,
        })
    }

    /// Human-readable text for diagnostics that don't have source text handy
    /// (sentinels have no backing bytes).
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::FBeg => "^",
            TokenKind::FEnd => "$",
            TokenKind::Sentinel => "<unknown>",
            _ => "",
        }
    }
}

/// A lexed token: a kind plus the half-open byte range `begin..end` it
/// occupies in the original input buffer.
///
/// [`TokenKind::FBeg`] and [`TokenKind::FEnd`] carry an empty range at,
/// respectively, the start and the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, begin: usize, end: usize) -> Self {
        Self { kind, begin, end }
    }

    /// The token's source text, given the buffer it was lexed from.
    pub fn text<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.begin..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}
