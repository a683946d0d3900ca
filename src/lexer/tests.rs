//! End-to-end lexer tests exercising [`Lexer::tokenize`] over small
//! source snippets.

use super::Lexer;
use crate::token::TokenKind;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
}

fn non_trivia_kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .tokenize()
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn tokenizes_a_let_declaration() {
    let kinds = non_trivia_kinds("let x: Int = 1 + 2");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Integer,
            TokenKind::Plus,
            TokenKind::Integer,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn always_ends_with_exactly_one_eof() {
    let tokens = Lexer::new("let x = 1").tokenize();
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
}

#[test]
fn tokenizes_empty_source_as_just_eof() {
    let tokens = Lexer::new("").tokenize();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn distinguishes_move_arrow_variants() {
    assert_eq!(non_trivia_kinds("<-"), vec![TokenKind::Arrow, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("<-!"), vec![TokenKind::ForceArrow, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("<->"), vec![TokenKind::Swap, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("<"), vec![TokenKind::Less, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("<="), vec![TokenKind::LessEqual, TokenKind::Eof]);
}

#[test]
fn doc_line_comment_is_distinguishable_from_plain_line_comment() {
    let doc = Lexer::new("/// hello").tokenize();
    let plain = Lexer::new("// hello").tokenize();
    // The raw `//`/`///` marker is preserved in the token text so that
    // doc-comment association (see `crate::context`) can tell them apart.
    assert_ne!(doc[0].value, plain[0].value);
}

#[test]
fn doc_block_comment_delimiter_is_preserved() {
    let tokens = Lexer::new("/** hi */").tokenize();
    assert_eq!(tokens[0].kind, TokenKind::BlockCommentStart);
    match &tokens[0].value {
        crate::token::TokenValue::Comment(text) => assert_eq!(text, "/**"),
        other => panic!("expected Comment value, got {:?}", other),
    }
    assert_eq!(tokens[1].kind, TokenKind::BlockCommentContent);
    assert_eq!(tokens[2].kind, TokenKind::BlockCommentEnd);
}

#[test]
fn plain_block_comment_delimiter_is_two_stars() {
    let tokens = Lexer::new("/* hi */").tokenize();
    match &tokens[0].value {
        crate::token::TokenValue::Comment(text) => assert_eq!(text, "/*"),
        other => panic!("expected Comment value, got {:?}", other),
    }
}

#[test]
fn unterminated_block_comment_yields_error_token() {
    let tokens = Lexer::new("/* never closed").tokenize();
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
}

#[test]
fn space_run_reports_whether_it_spans_a_newline() {
    let tokens = Lexer::new("a  b\nc").tokenize();
    let spaces: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Space)
        .collect();
    assert_eq!(spaces.len(), 2);
    match &spaces[0].value {
        crate::token::TokenValue::Space(s) => assert!(!s.contains_newline),
        other => panic!("expected Space value, got {:?}", other),
    }
    match &spaces[1].value {
        crate::token::TokenValue::Space(s) => assert!(s.contains_newline),
        other => panic!("expected Space value, got {:?}", other),
    }
}

#[test]
fn hexadecimal_integer_is_a_distinct_kind_from_decimal() {
    assert_eq!(non_trivia_kinds("0xFF"), vec![TokenKind::HexadecimalInteger, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("255"), vec![TokenKind::Integer, TokenKind::Eof]);
}

#[test]
fn fixed_point_literal_is_tokenized_as_one_token() {
    assert_eq!(non_trivia_kinds("1.05"), vec![TokenKind::FixedPoint, TokenKind::Eof]);
}

#[test]
fn member_access_after_integer_is_not_absorbed_into_fixed_point() {
    // `1.foo` must lex as Integer, Dot, Identifier — not a malformed
    // fixed-point literal — since integers support member access
    // (e.g. `1.toString`-style calls in expression position).
    assert_eq!(
        non_trivia_kinds("1.foo"),
        vec![
            TokenKind::Integer,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn double_question_and_double_ampersand_are_distinct_from_single_forms() {
    assert_eq!(non_trivia_kinds("??"), vec![TokenKind::DoubleQuestion, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("?"), vec![TokenKind::Question, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("&&"), vec![TokenKind::AmpAmp, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("&"), vec![TokenKind::Amp, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("||"), vec![TokenKind::PipePipe, TokenKind::Eof]);
    assert_eq!(non_trivia_kinds("|"), vec![TokenKind::Pipe, TokenKind::Eof]);
}

#[test]
fn unknown_character_becomes_an_error_token() {
    let tokens = kinds("`");
    assert!(tokens.contains(&TokenKind::Error));
}
