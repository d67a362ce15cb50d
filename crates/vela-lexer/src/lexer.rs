//! Core Vela lexer: converts source text to tokens on demand.
//!
//! The lexer never fails. Characters no rule accepts come out as
//! [`TokenKind::Illegal`] tokens, one per character, and the parser decides
//! what to report. Once the input is exhausted every further call to
//! [`Lexer::next_token`] returns [`TokenKind::Eof`].

use std::iter::Peekable;
use std::str::CharIndices;

use vela_types::{Span, Token, TokenKind};

/// Accented letters accepted in identifiers besides ASCII letters and `_`.
const EXTRA_LETTERS: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'Á', 'É', 'Í', 'Ó', 'Ú', 'ñ', 'Ñ'];

/// Returns `true` if `ch` may start or continue an identifier.
pub fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || EXTRA_LETTERS.contains(&ch)
}

/// Whitespace skipped between tokens: space, tab, line feed, carriage
/// return, vertical tab and form feed. Other Unicode spaces are illegal.
pub fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// The Vela lexer.
///
/// Works over Unicode scalar values, so a multi-byte character is a single
/// position for both scanning and column counting.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    /// Byte offset of the next unread character.
    offset: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Set once the iterator has yielded its end-of-input token.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Produce the next token, advancing past it.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.offset;
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Token::eof(self.current_span());
        };

        let single = |lexer: &Self, kind: TokenKind| {
            Token::new(kind, ch.to_string(), lexer.span_from(start_line, start_col))
        };

        match ch {
            // ── One or two characters ──
            '=' => self.one_or_two('=', TokenKind::Eq, TokenKind::Assign, start_line, start_col),
            '!' => self.one_or_two('!', TokenKind::NotEq, TokenKind::Bang, start_line, start_col),

            // ── Operators ──
            '+' => single(self, TokenKind::Plus),
            '-' => single(self, TokenKind::Minus),
            '*' => single(self, TokenKind::Asterisk),
            '/' => single(self, TokenKind::Slash),
            '<' => single(self, TokenKind::Lt),
            '>' => single(self, TokenKind::Gt),

            // ── Delimiters ──
            '(' => single(self, TokenKind::LParen),
            ')' => single(self, TokenKind::RParen),
            '{' => single(self, TokenKind::LBrace),
            '}' => single(self, TokenKind::RBrace),
            ',' => single(self, TokenKind::Comma),
            ';' => single(self, TokenKind::Semicolon),

            // ── Literals ──
            '"' => self.scan_string(start_line, start_col),
            c if is_letter(c) => self.scan_word(start, start_line, start_col),
            c if c.is_ascii_digit() => self.scan_integer(start, start_line, start_col),

            _ => single(self, TokenKind::Illegal),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn advance(&mut self) -> Option<char> {
        let (index, ch) = self.chars.next()?;
        self.offset = index + ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    /// Source text from byte offset `start` up to the cursor.
    fn text_from(&self, start: usize) -> String {
        self.source[start..self.offset].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanners
    // ─────────────────────────────────────────────────────────────

    /// `=`/`==` and `!`/`!=`: the first character is already consumed.
    fn one_or_two(
        &mut self,
        first: char,
        double: TokenKind,
        single: TokenKind,
        start_line: u32,
        start_col: u32,
    ) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            Token::new(double, format!("{first}="), self.span_from(start_line, start_col))
        } else {
            Token::new(single, first.to_string(), self.span_from(start_line, start_col))
        }
    }

    /// Identifier or keyword. Digits may follow the first letter.
    fn scan_word(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while self
            .peek()
            .is_some_and(|c| is_letter(c) || c.is_ascii_digit())
        {
            self.advance();
        }
        let text = self.text_from(start);
        let kind = TokenKind::from_keyword(&text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, self.span_from(start_line, start_col))
    }

    fn scan_integer(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        Token::new(
            TokenKind::Int,
            self.text_from(start),
            self.span_from(start_line, start_col),
        )
    }

    /// String body up to the closing `"` or end of input. No escapes.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.offset;
        while self.peek().is_some_and(|c| c != '"') {
            self.advance();
        }
        let text = self.text_from(start);
        // Closing quote, when present.
        self.advance();
        Token::new(TokenKind::String, text, self.span_from(start_line, start_col))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token through the first end-of-input token.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
