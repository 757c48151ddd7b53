//! Tokenizer for the target language's indentation-sensitive grammar.
//!
//! Grounded on the general shape of `original_source/`'s reliance on
//! Python's own `tokenize` module (see `fixers/_util.py::tokenize_source`):
//! we track indentation with an explicit stack and emit synthetic
//! `Indent`/`Dedent`/`Newline` tokens the parser consumes like any other.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Name(String),
    Str(String),
    Number(String),
    Op(&'static str),
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: TokenPos,
    pub end: TokenPos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub pos: TokenPos,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.pos.line, self.pos.column)
    }
}

const MULTI_CHAR_OPS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "->", ":=", "==", "!=", "<=", ">=", "**", "//", "<<", ">>",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=",
];

const SINGLE_CHAR_OPS: &str = "+-*/%@&|^~<>()[]{},:.;=";

/// Tokenize `source` into a flat stream ending in `EndMarker`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    indents: Vec<u32>,
    paren_depth: i32,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            indents: vec![0],
            paren_depth: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn here(&self) -> TokenPos {
        TokenPos {
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            if self.at_line_start && self.paren_depth == 0 {
                if self.handle_indentation()? {
                    continue;
                }
            }
            self.skip_intraline_whitespace_and_comments();

            let Some(c) = self.peek() else {
                break;
            };

            if c == '\n' {
                let start = self.here();
                self.advance();
                if self.paren_depth == 0 {
                    self.tokens.push(Token {
                        kind: TokenKind::Newline,
                        start,
                        end: self.here(),
                    });
                    self.at_line_start = true;
                }
                continue;
            }
            if c == '\\' && self.peek2() == Some('\n') {
                self.advance();
                self.advance();
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                self.lex_name();
            } else if c.is_ascii_digit() {
                self.lex_number();
            } else if c == '"' || c == '\'' {
                self.lex_string()?;
            } else if "rRbBuUfF".contains(c) && self.is_string_prefix() {
                self.lex_string()?;
            } else {
                self.lex_op()?;
            }
        }

        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token {
                kind: TokenKind::Dedent,
                start: self.here(),
                end: self.here(),
            });
        }
        self.tokens.push(Token {
            kind: TokenKind::EndMarker,
            start: self.here(),
            end: self.here(),
        });
        Ok(self.tokens)
    }

    fn is_string_prefix(&self) -> bool {
        let mut i = self.pos;
        while let Some(c) = self.chars.get(i) {
            if "rRbBuUfF".contains(*c) {
                i += 1;
            } else {
                break;
            }
        }
        matches!(self.chars.get(i), Some('"') | Some('\''))
    }

    /// Consumes blank lines, comment-only lines, and emits Indent/Dedent for
    /// the first real line. Returns `true` if it consumed a blank/comment
    /// line and the caller should loop again.
    fn handle_indentation(&mut self) -> Result<bool, LexError> {
        let start = self.pos;
        let mut width = 0u32;
        while let Some(c) = self.peek() {
            match c {
                ' ' => {
                    width += 1;
                    self.advance();
                }
                '\t' => {
                    width += 8 - (width % 8);
                    self.advance();
                }
                _ => break,
            }
        }
        match self.peek() {
            None => return Ok(false),
            Some('\n') => {
                self.advance();
                return Ok(true);
            }
            Some('#') => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                return Ok(true);
            }
            _ => {}
        }
        if self.pos == start && width == 0 && self.indents.last() == Some(&0) {
            self.at_line_start = false;
            return Ok(false);
        }
        self.at_line_start = false;
        let current = *self.indents.last().unwrap();
        if width > current {
            self.indents.push(width);
            self.tokens.push(Token {
                kind: TokenKind::Indent,
                start: self.here(),
                end: self.here(),
            });
        } else {
            while *self.indents.last().unwrap() > width {
                self.indents.pop();
                self.tokens.push(Token {
                    kind: TokenKind::Dedent,
                    start: self.here(),
                    end: self.here(),
                });
            }
            if *self.indents.last().unwrap() != width {
                return Err(LexError {
                    message: "unindent does not match any outer indentation level".to_string(),
                    pos: self.here(),
                });
            }
        }
        Ok(false)
    }

    fn skip_intraline_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('\\') if self.peek2() == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn lex_name(&mut self) {
        let start = self.here();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::Name(s),
            start,
            end: self.here(),
        });
    }

    fn lex_number(&mut self) {
        let start = self.here();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '.' || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::Number(s),
            start,
            end: self.here(),
        });
    }

    fn lex_string(&mut self) -> Result<(), LexError> {
        let start = self.here();
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if "rRbBuUfF".contains(c) {
                prefix.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let quote = self.peek().unwrap();
        let triple = self.peek2() == Some(quote)
            && self.chars.get(self.pos + 2).copied() == Some(quote);
        let mut value = String::new();
        if triple {
            self.advance();
            self.advance();
            self.advance();
            loop {
                if self.peek() == Some(quote)
                    && self.peek2() == Some(quote)
                    && self.chars.get(self.pos + 2).copied() == Some(quote)
                {
                    self.advance();
                    self.advance();
                    self.advance();
                    break;
                }
                match self.advance() {
                    Some(c) => value.push(c),
                    None => {
                        return Err(LexError {
                            message: "unterminated triple-quoted string".to_string(),
                            pos: start,
                        });
                    }
                }
            }
        } else {
            self.advance();
            loop {
                match self.peek() {
                    Some(c) if c == quote => {
                        self.advance();
                        break;
                    }
                    Some('\\') => {
                        self.advance();
                        if let Some(esc) = self.advance() {
                            value.push('\\');
                            value.push(esc);
                        }
                    }
                    Some('\n') | None => {
                        return Err(LexError {
                            message: "unterminated string literal".to_string(),
                            pos: start,
                        });
                    }
                    Some(c) => {
                        value.push(c);
                        self.advance();
                    }
                }
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::Str(value),
            start,
            end: self.here(),
        });
        Ok(())
    }

    fn lex_op(&mut self) -> Result<(), LexError> {
        let start = self.here();
        for op in MULTI_CHAR_OPS {
            if self.src_matches_ahead(op) {
                for _ in 0..op.len() {
                    self.advance();
                }
                self.track_paren(op);
                self.tokens.push(Token {
                    kind: TokenKind::Op(op),
                    start,
                    end: self.here(),
                });
                return Ok(());
            }
        }
        let c = self.peek().unwrap();
        if SINGLE_CHAR_OPS.contains(c) {
            self.advance();
            let op = match c {
                '+' => "+",
                '-' => "-",
                '*' => "*",
                '/' => "/",
                '%' => "%",
                '@' => "@",
                '&' => "&",
                '|' => "|",
                '^' => "^",
                '~' => "~",
                '<' => "<",
                '>' => ">",
                '(' => "(",
                ')' => ")",
                '[' => "[",
                ']' => "]",
                '{' => "{",
                '}' => "}",
                ',' => ",",
                ':' => ":",
                '.' => ".",
                ';' => ";",
                '=' => "=",
                _ => unreachable!(),
            };
            self.track_paren(op);
            self.tokens.push(Token {
                kind: TokenKind::Op(op),
                start,
                end: self.here(),
            });
            Ok(())
        } else {
            Err(LexError {
                message: format!("unexpected character {c:?}"),
                pos: start,
            })
        }
    }

    fn track_paren(&mut self, op: &str) {
        match op {
            "(" | "[" | "{" => self.paren_depth += 1,
            ")" | "]" | "}" => self.paren_depth = (self.paren_depth - 1).max(0),
            _ => {}
        }
    }

    fn src_matches_ahead(&self, op: &str) -> bool {
        op.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }
}
