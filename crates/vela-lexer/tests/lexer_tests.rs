//! Lexer tests: operators, delimiters, keywords, literals, accented
//! identifiers, illegal characters, end-of-input behaviour, and the
//! 100-iteration determinism check.

use pretty_assertions::assert_eq;
use vela_lexer::{Lexer, Token, TokenKind};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Pull exactly `n` tokens from a fresh lexer.
fn take(source: &str, n: usize) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    (0..n).map(|_| lexer.next_token()).collect()
}

/// Lex with the iterator and return (kind, literal) pairs, Eof included.
fn pairs(source: &str) -> Vec<(TokenKind, String)> {
    Lexer::new(source).map(|t| (t.kind, t.literal)).collect()
}

/// Lex and return just the token kinds, excluding the final Eof.
fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::Eof)
        .collect()
}

fn pair(kind: TokenKind, literal: &str) -> (TokenKind, String) {
    (kind, literal.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Illegal characters
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_illegal_characters_one_token_each() {
    let tokens = take("¡¿@", 3);
    let expected = vec![
        pair(TokenKind::Illegal, "¡"),
        pair(TokenKind::Illegal, "¿"),
        pair(TokenKind::Illegal, "@"),
    ];
    let actual: Vec<_> = tokens.into_iter().map(|t| (t.kind, t.literal)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_illegal_between_identifiers() {
    assert_eq!(
        kinds("a # b"),
        vec![TokenKind::Ident, TokenKind::Illegal, TokenKind::Ident]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operators & delimiters
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_one_character_operator_then_eof() {
    let tokens = take("+", 2);
    assert_eq!(tokens[0].kind, TokenKind::Plus);
    assert_eq!(tokens[0].literal, "+");
    assert_eq!(tokens[1].kind, TokenKind::Eof);
    assert_eq!(tokens[1].literal, "");
}

#[test]
fn test_operators() {
    assert_eq!(
        pairs("=+-/*<>!"),
        vec![
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Plus, "+"),
            pair(TokenKind::Minus, "-"),
            pair(TokenKind::Slash, "/"),
            pair(TokenKind::Asterisk, "*"),
            pair(TokenKind::Lt, "<"),
            pair(TokenKind::Gt, ">"),
            pair(TokenKind::Bang, "!"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_delimiters() {
    assert_eq!(
        kinds("(){},;"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_two_character_operators() {
    assert_eq!(
        pairs("10 == 10; 10 != 9;"),
        vec![
            pair(TokenKind::Int, "10"),
            pair(TokenKind::Eq, "=="),
            pair(TokenKind::Int, "10"),
            pair(TokenKind::Semicolon, ";"),
            pair(TokenKind::Int, "10"),
            pair(TokenKind::NotEq, "!="),
            pair(TokenKind::Int, "9"),
            pair(TokenKind::Semicolon, ";"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_assign_followed_by_bang() {
    assert_eq!(kinds("=!"), vec![TokenKind::Assign, TokenKind::Bang]);
    assert_eq!(kinds("= ="), vec![TokenKind::Assign, TokenKind::Assign]);
}

// ─────────────────────────────────────────────────────────────────────
// Keywords & identifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_statement() {
    assert_eq!(
        pairs("var cinco = 5;"),
        vec![
            pair(TokenKind::Var, "var"),
            pair(TokenKind::Ident, "cinco"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Int, "5"),
            pair(TokenKind::Semicolon, ";"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_function_declaration() {
    let source = "var suma = function(x, y) {\n    x + y;\n};";
    assert_eq!(
        pairs(source),
        vec![
            pair(TokenKind::Var, "var"),
            pair(TokenKind::Ident, "suma"),
            pair(TokenKind::Assign, "="),
            pair(TokenKind::Function, "function"),
            pair(TokenKind::LParen, "("),
            pair(TokenKind::Ident, "x"),
            pair(TokenKind::Comma, ","),
            pair(TokenKind::Ident, "y"),
            pair(TokenKind::RParen, ")"),
            pair(TokenKind::LBrace, "{"),
            pair(TokenKind::Ident, "x"),
            pair(TokenKind::Plus, "+"),
            pair(TokenKind::Ident, "y"),
            pair(TokenKind::Semicolon, ";"),
            pair(TokenKind::RBrace, "}"),
            pair(TokenKind::Semicolon, ";"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_control_statement() {
    assert_eq!(
        kinds("if (5 < 10) { return true; } else { return false; }"),
        vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Int,
            TokenKind::Lt,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Else,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::False,
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_accented_identifiers() {
    assert_eq!(
        pairs("var número_año = 1;")[1],
        pair(TokenKind::Ident, "número_año")
    );
}

#[test]
fn test_identifier_with_digits() {
    assert_eq!(pairs("x1y2")[0], pair(TokenKind::Ident, "x1y2"));
    // A digit cannot start an identifier.
    assert_eq!(kinds("1x"), vec![TokenKind::Int, TokenKind::Ident]);
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("Var IF True"), vec![TokenKind::Ident; 3]);
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_string_literals() {
    assert_eq!(
        pairs("\"foo\" \"Hola mundo\""),
        vec![
            pair(TokenKind::String, "foo"),
            pair(TokenKind::String, "Hola mundo"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_string_has_no_escapes() {
    assert_eq!(pairs(r#""a\nb""#)[0], pair(TokenKind::String, r"a\nb"));
}

#[test]
fn test_empty_string() {
    assert_eq!(pairs("\"\"")[0], pair(TokenKind::String, ""));
}

#[test]
fn test_unterminated_string_runs_to_eof() {
    assert_eq!(
        pairs("\"abc def"),
        vec![pair(TokenKind::String, "abc def"), pair(TokenKind::Eof, "")]
    );
}

#[test]
fn test_integers_have_no_fraction() {
    assert_eq!(
        pairs("3.14"),
        vec![
            pair(TokenKind::Int, "3"),
            pair(TokenKind::Illegal, "."),
            pair(TokenKind::Int, "14"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// End of input
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_eof_is_returned_repeatedly() {
    let tokens = take("x", 5);
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert!(tokens[1..].iter().all(|t| t.kind == TokenKind::Eof));
}

#[test]
fn test_iterator_stops_after_first_eof() {
    let tokens: Vec<Token> = Lexer::new("  \n\t ").collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        kinds("  var\n\tx\r\n=\n1 "),
        vec![
            TokenKind::Var,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Int
        ]
    );
}

#[test]
fn test_unicode_spaces_are_illegal() {
    assert_eq!(
        pairs("a\u{A0}b\u{3000}"),
        vec![
            pair(TokenKind::Ident, "a"),
            pair(TokenKind::Illegal, "\u{A0}"),
            pair(TokenKind::Ident, "b"),
            pair(TokenKind::Illegal, "\u{3000}"),
            pair(TokenKind::Eof, ""),
        ]
    );
    assert_eq!(kinds("1\x0B\x0C2"), vec![TokenKind::Int, TokenKind::Int]);
}

#[test]
fn test_multibyte_text_is_sliced_whole() {
    assert_eq!(
        pairs("año \"¡hola, señor!\" 42"),
        vec![
            pair(TokenKind::Ident, "año"),
            pair(TokenKind::String, "¡hola, señor!"),
            pair(TokenKind::Int, "42"),
            pair(TokenKind::Eof, ""),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lexer_determinism_100_iterations() {
    let source = "var f = function(x) { if (x != 0) { return \"ñ\"; } };\nf(1) == ¡";
    let first = pairs(source);
    for i in 0..100 {
        assert_eq!(pairs(source), first, "lexer output differed on iteration {i}");
    }
}
