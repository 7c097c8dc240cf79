// Copyright 2025 FormLogic Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenizer for form expressions
//!
//! Scans left to right with maximal munch, skipping whitespace, and
//! recognizes four lexeme classes: numeric literals, variable tokens (a
//! `$` sigil followed by an identifier), bracket/paren delimiters, and
//! operator symbols. String literals and the `true`/`false`/`null`
//! keywords round out the literal forms the operator tree can hold.
//!
//! Operator spellings that are recognizable but outside the supported set
//! (`=`, `!=`, a single `&` or `|`) fail as `unsupported_operator` so the
//! author sees the operator named rather than a character-level complaint;
//! characters matching no lexeme class fail as `unexpected_character` with
//! their position.

use crate::error::{ParseError, ParseResult};

/// A token with zero-copy string slices into the expression source
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Numeric literal (integer or decimal)
    Number(f64),
    /// String literal content, quotes stripped
    String(&'input str),
    /// Boolean literal `true`
    True,
    /// Boolean literal `false`
    False,
    /// Null literal
    Null,
    /// Variable token, sigil stripped (e.g. `$census` yields `census`)
    Variable(&'input str),

    /// Logical AND operator (`&&`)
    AndAnd,
    /// Logical OR operator (`||`)
    OrOr,
    /// Strict equality (`===`), downgraded to `==` by the parser
    StrictEqual,
    /// Loose equality (`==`)
    EqualEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Less than (`<`)
    Less,
    /// Addition (`+`)
    Plus,
    /// Subtraction or negation (`-`)
    Minus,
    /// Multiplication (`*`)
    Star,
    /// Division (`/`)
    Slash,
    /// Logical NOT prefix (`!`)
    Bang,
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
    /// Left square bracket
    LeftBracket,
    /// Right square bracket
    RightBracket,
}

impl Token<'_> {
    /// Short description of this token for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::String(s) => format!("string \"{s}\""),
            Token::True => "'true'".to_string(),
            Token::False => "'false'".to_string(),
            Token::Null => "'null'".to_string(),
            Token::Variable(name) => format!("variable ${name}"),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::StrictEqual => "===",
            Token::EqualEqual => "==",
            Token::GreaterEqual => ">=",
            Token::LessEqual => "<=",
            Token::Greater => ">",
            Token::Less => "<",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Bang => "!",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            _ => "",
        }
    }
}

/// A token paired with its byte offset into the source
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'input> {
    /// The token itself
    pub token: Token<'input>,
    /// Byte offset where the token starts
    pub start: usize,
}

/// Fast identifier start character check
static ID_START_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = matches!(i as u8, b'A'..=b'Z' | b'a'..=b'z' | b'_');
        i += 1;
    }
    table
};

/// Fast identifier continuation character check
static ID_CHAR_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = matches!(i as u8, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_');
        i += 1;
    }
    table
};

/// Byte-scanning tokenizer over one expression string
#[derive(Clone)]
pub struct Tokenizer<'input> {
    bytes: &'input [u8],
    pos: usize,
    end: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a new tokenizer over the given source
    pub fn new(input: &'input str) -> Self {
        let bytes = input.as_bytes();
        Self {
            bytes,
            pos: 0,
            end: bytes.len(),
        }
    }

    #[inline(always)]
    fn is_id_start(ch: u8) -> bool {
        ID_START_TABLE[ch as usize]
    }

    #[inline(always)]
    fn is_id_continue(ch: u8) -> bool {
        ID_CHAR_TABLE[ch as usize]
    }

    #[inline(always)]
    fn slice(&self, start: usize, end: usize) -> &'input str {
        // Input is valid UTF-8 and lexeme boundaries fall on ASCII
        std::str::from_utf8(&self.bytes[start..end]).unwrap_or("")
    }

    #[inline(always)]
    fn skip_whitespace(&mut self) {
        while self.pos < self.end {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn parse_number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.pos;
        while self.pos < self.end && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        // Optional fraction, only when a digit follows the dot
        if self.pos + 1 < self.end
            && self.bytes[self.pos] == b'.'
            && self.bytes[self.pos + 1].is_ascii_digit()
        {
            self.pos += 1;
            while self.pos < self.end && self.bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        let text = self.slice(start, self.pos);
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| ParseError::syntax(format!("invalid number '{text}'"), start))
    }

    fn parse_string_literal(&mut self, quote: u8) -> ParseResult<&'input str> {
        let opening = self.pos;
        self.pos += 1; // opening quote
        let start = self.pos;
        while self.pos < self.end {
            match self.bytes[self.pos] {
                b if b == quote => {
                    let content = self.slice(start, self.pos);
                    self.pos += 1; // closing quote
                    return Ok(content);
                }
                b'\\' => {
                    self.pos += if self.pos + 1 < self.end { 2 } else { 1 };
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::syntax("unterminated string literal", opening))
    }

    fn parse_identifier(&mut self) -> &'input str {
        let start = self.pos;
        while self.pos < self.end && Self::is_id_continue(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }

    fn parse_variable(&mut self) -> ParseResult<Token<'input>> {
        let sigil = self.pos;
        self.pos += 1; // '$'
        if self.pos >= self.end || !Self::is_id_start(self.bytes[self.pos]) {
            return Err(ParseError::UnexpectedCharacter {
                ch: '$',
                position: sigil,
            });
        }
        Ok(Token::Variable(self.parse_identifier()))
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<SpannedToken<'input>>> {
        self.skip_whitespace();
        if self.pos >= self.end {
            return Ok(None);
        }

        let start = self.pos;
        let byte = self.bytes[start];
        let second = self.bytes.get(start + 1).copied();

        let token = match byte {
            b'(' => {
                self.pos += 1;
                Token::LeftParen
            }
            b')' => {
                self.pos += 1;
                Token::RightParen
            }
            b'[' => {
                self.pos += 1;
                Token::LeftBracket
            }
            b']' => {
                self.pos += 1;
                Token::RightBracket
            }
            b'+' => {
                self.pos += 1;
                Token::Plus
            }
            b'-' => {
                self.pos += 1;
                Token::Minus
            }
            b'*' => {
                self.pos += 1;
                Token::Star
            }
            b'/' => {
                self.pos += 1;
                Token::Slash
            }

            // Maximal munch: `===` before `==` before the unsupported `=`
            b'=' => match (second, self.bytes.get(start + 2)) {
                (Some(b'='), Some(b'=')) => {
                    self.pos += 3;
                    Token::StrictEqual
                }
                (Some(b'='), _) => {
                    self.pos += 2;
                    Token::EqualEqual
                }
                _ => {
                    return Err(ParseError::UnsupportedOperator {
                        symbol: "=".to_string(),
                        position: start,
                    });
                }
            },
            b'>' => {
                if second == Some(b'=') {
                    self.pos += 2;
                    Token::GreaterEqual
                } else {
                    self.pos += 1;
                    Token::Greater
                }
            }
            b'<' => {
                if second == Some(b'=') {
                    self.pos += 2;
                    Token::LessEqual
                } else {
                    self.pos += 1;
                    Token::Less
                }
            }
            b'&' => {
                if second == Some(b'&') {
                    self.pos += 2;
                    Token::AndAnd
                } else {
                    return Err(ParseError::UnsupportedOperator {
                        symbol: "&".to_string(),
                        position: start,
                    });
                }
            }
            b'|' => {
                if second == Some(b'|') {
                    self.pos += 2;
                    Token::OrOr
                } else {
                    return Err(ParseError::UnsupportedOperator {
                        symbol: "|".to_string(),
                        position: start,
                    });
                }
            }
            b'!' => {
                if second == Some(b'=') {
                    return Err(ParseError::UnsupportedOperator {
                        symbol: "!=".to_string(),
                        position: start,
                    });
                }
                self.pos += 1;
                Token::Bang
            }

            b'$' => self.parse_variable()?,
            b'0'..=b'9' => self.parse_number()?,
            b'\'' | b'"' => Token::String(self.parse_string_literal(byte)?),

            ch if Self::is_id_start(ch) => match self.parse_identifier() {
                "true" => Token::True,
                "false" => Token::False,
                "null" => Token::Null,
                word => {
                    return Err(ParseError::syntax(
                        format!("unrecognized word '{word}' (variables need a '$' sigil)"),
                        start,
                    ));
                }
            },

            ch => {
                return Err(ParseError::UnexpectedCharacter {
                    ch: ch as char,
                    position: start,
                });
            }
        };

        Ok(Some(SpannedToken { token, start }))
    }

    /// Current byte offset into the source
    pub fn position(&self) -> usize {
        self.pos
    }
}
