//! Hand-written lexer turning Gorilla source text into a token stream.

use crate::token::{Token, TokenKind};

/// Byte-oriented lexer. Gorilla identifiers and operators are all ASCII, so
/// scanning bytes rather than `char`s avoids UTF-8 boundary bookkeeping for
/// everything except string literal contents, which are preserved verbatim
/// (they may contain arbitrary UTF-8 and are indexed byte-wise anyway, per
/// the string value's byte-indexing rule).
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.as_bytes().to_vec(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }

        self.ch = if self.read_position >= self.input.len() {
            0
        } else {
            self.input[self.read_position]
        };
        self.position = self.read_position;
        self.read_position += 1;
        self.column += 1;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input[self.read_position]
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    fn skip_line_comment(&mut self) {
        while self.ch != b'\n' && self.ch != 0 {
            self.read_char();
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.ch == b'/' && self.peek_char() == b'/' {
            self.skip_line_comment();
            self.skip_whitespace();
        }

        let (line, column) = (self.line, self.column);

        let kind = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'"' => TokenKind::Str(self.read_string()),
            0 => TokenKind::Eof,
            ch if ch.is_ascii_alphabetic() || ch == b'_' => {
                let ident = self.read_identifier();
                return Token::new(Token::lookup_ident(&ident), line, column);
            }

            ch if ch.is_ascii_digit() => {
                return Token::new(self.read_number(), line, column);
            }
            ch => TokenKind::Illegal(ch as char),
        };

        self.read_char();
        Token::new(kind, line, column)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while self.ch.is_ascii_alphanumeric() || self.ch == b'_' {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    fn read_number(&mut self) -> TokenKind {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        let text = std::str::from_utf8(&self.input[start..self.position]).unwrap_or("");
        match text.parse() {
            Ok(n) => TokenKind::Int(n),
            Err(_) => TokenKind::InvalidInt(text.to_string()),
        }
    }

    fn read_string(&mut self) -> String {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == 0 {
                break;
            }
            if self.ch == b'\\' {
                self.read_char();
            }
        }
        let raw = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
        unescape(&raw)
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
