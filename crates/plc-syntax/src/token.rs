//! Token definitions shared between the external scanner and the parser.
//!
//! The scanner itself lives outside this toolchain. What it hands over is an
//! ordered sequence of [`Token`]s, each carrying a coarse [`TokenKind`], the
//! exact literal text it was built from, and the offset of that text in the
//! original source.
//!
//! Keywords (`fun`, `do`, `end`, ...) are not a separate kind: they arrive as
//! [`TokenKind::Identifier`] tokens and the parser matches their literal text.
//! Character and string tokens keep their surrounding quotes and raw escape
//! sequences; decoding them is the parser's responsibility.
//!
//! # Examples
//!
//! ```rust
//! use plc_syntax::{Token, TokenKind};
//!
//! let tokens = vec![
//!     Token::new(TokenKind::Identifier, "print", 0),
//!     Token::new(TokenKind::Operator, "(", 5),
//!     Token::new(TokenKind::String, "\"hi\"", 6),
//!     Token::new(TokenKind::Operator, ")", 10),
//! ];
//! assert_eq!(tokens[2].literal, "\"hi\"");
//! ```

use serde::{Deserialize, Serialize};

/// The coarse category a scanner assigns to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Names and keywords: `main`, `x1`, `END`
    Identifier,
    /// Integer literals: `42`, `-7`
    Integer,
    /// Decimal literals: `1.0`, `-0.25`
    Decimal,
    /// Character literals including quotes: `'a'`, `'\n'`
    Character,
    /// String literals including quotes: `"hello\tworld"`
    String,
    /// Everything else: `(`, `==`, `&&`, `;`
    Operator,
}

/// A token with its literal text and source offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The category of this token
    pub kind: TokenKind,

    /// The exact source text of the token
    pub literal: String,

    /// Byte offset of the first character of the token in the source
    pub offset: usize,
}

/// Single characters that always form a token on their own in [`Token::split`].
const PUNCTUATION: [char; 7] = ['(', ')', '[', ']', ',', ';', ':'];

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            offset,
        }
    }

    /// Offset one past the last byte of this token.
    pub fn end(&self) -> usize {
        self.offset + self.literal.len()
    }

    /// Splits pre-spaced text into tokens.
    ///
    /// This is not a scanner. Words are separated by whitespace and the
    /// punctuation characters `( ) [ ] , ; :`, and every other operator must be
    /// surrounded by spaces (`x == 1`, not `x==1`). Quoted character and string
    /// literals may contain whitespace and escaped quotes. Each word is
    /// classified by its leading characters.
    ///
    /// A sign directly followed by a digit starts a number, so `x -1` is the
    /// name `x` and the literal `-1`, which does not parse as a subtraction.
    /// Write `x - 1` to subtract.
    ///
    /// It exists so tests and embedding hosts can hand the parser readable
    /// programs without depending on a real scanner.
    ///
    /// ```rust
    /// use plc_syntax::{Token, TokenKind};
    ///
    /// let tokens = Token::split("LET s = \"a b\";");
    /// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    /// assert_eq!(kinds, vec![
    ///     TokenKind::Identifier,
    ///     TokenKind::Identifier,
    ///     TokenKind::Operator,
    ///     TokenKind::String,
    ///     TokenKind::Operator,
    /// ]);
    /// assert_eq!(tokens[3].literal, "\"a b\"");
    /// assert_eq!(tokens[3].offset, 8);
    /// ```
    pub fn split(src: &str) -> Vec<Token> {
        let chars: Vec<(usize, char)> = src.char_indices().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let (start, c) = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            if c == '"' || c == '\'' {
                while j < chars.len() {
                    let d = chars[j].1;
                    j += if d == '\\' { 2 } else { 1 };
                    if d == c {
                        break;
                    }
                }
            } else if !PUNCTUATION.contains(&c) {
                while j < chars.len()
                    && !chars[j].1.is_whitespace()
                    && !PUNCTUATION.contains(&chars[j].1)
                {
                    j += 1;
                }
            }
            let j = j.min(chars.len());
            let end = chars.get(j).map_or(src.len(), |(offset, _)| *offset);
            let word = &src[start..end];
            tokens.push(Token::new(TokenKind::classify(word), word, start));
            i = j;
        }
        tokens
    }
}

impl TokenKind {
    /// Guesses the kind of a whitespace-delimited word by its leading characters.
    /// `-1` and `+2` are numbers; `-` alone is an operator.
    pub fn classify(word: &str) -> TokenKind {
        let mut chars = word.chars();
        let first = chars.next();
        let second = chars.next();
        match first {
            Some('\'') => TokenKind::Character,
            Some('"') => TokenKind::String,
            Some(c) if c.is_ascii_digit() => Self::number(word),
            Some('-') | Some('+') if second.is_some_and(|d| d.is_ascii_digit()) => {
                Self::number(word)
            }
            Some(c) if c.is_alphabetic() || c == '_' || c == '@' => TokenKind::Identifier,
            _ => TokenKind::Operator,
        }
    }

    fn number(word: &str) -> TokenKind {
        if word.contains('.') {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        }
    }
}
