use crate::document::lexer::tokenize;
use crate::document::lexer::TokenKind;
use crate::document::RequestPreparationError;
use crate::document::SourceLocation;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("source lexes")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn punctuators_and_bind_sigil() {
    assert_eq!(
        kinds("{ hero(episode: &ep, id: $id) @include(if: true) { ...F } }"),
        vec![
            TokenKind::CurlyBraceOpen,
            TokenKind::Name,
            TokenKind::ParenOpen,
            TokenKind::Name,
            TokenKind::Colon,
            TokenKind::Ampersand,
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Colon,
            TokenKind::Dollar,
            TokenKind::Name,
            TokenKind::ParenClose,
            TokenKind::At,
            TokenKind::Name,
            TokenKind::ParenOpen,
            TokenKind::Name,
            TokenKind::Colon,
            TokenKind::Name,
            TokenKind::ParenClose,
            TokenKind::CurlyBraceOpen,
            TokenKind::Ellipsis,
            TokenKind::Name,
            TokenKind::CurlyBraceClose,
            TokenKind::CurlyBraceClose,
            TokenKind::Eof,
        ],
    );
}

#[test]
fn ampersands_inside_strings_and_comments_are_not_tokens() {
    assert_eq!(
        kinds("\"a & b\" # &not a param\n \"\"\"block & \\\"\"\" text\"\"\""),
        vec![TokenKind::StringValue, TokenKind::StringValue, TokenKind::Eof],
    );
}

#[test]
fn numbers_are_classified() {
    assert_eq!(
        kinds("0 -12 1.5 -0.25e10 6E-3"),
        vec![
            TokenKind::IntValue,
            TokenKind::IntValue,
            TokenKind::FloatValue,
            TokenKind::FloatValue,
            TokenKind::FloatValue,
            TokenKind::Eof,
        ],
    );
}

#[test]
fn malformed_numbers_are_rejected() {
    for source in ["1.", "-", "1e", "12abc"] {
        assert!(
            matches!(tokenize(source), Err(RequestPreparationError::InvalidNumber { .. })),
            "`{source}` should not lex",
        );
    }
}

#[test]
fn unterminated_strings_report_their_start() {
    assert_eq!(
        tokenize("{\n  hero(name: \"Luke\n) }"),
        Err(RequestPreparationError::UnterminatedString {
            location: SourceLocation { column: 14, line: 2 },
        }),
    );
    assert!(matches!(
        tokenize("\"\"\"never closed"),
        Err(RequestPreparationError::UnterminatedString { .. }),
    ));
}

#[test]
fn locations_track_lines_and_columns() {
    let tokens = tokenize("query\r\n  Hero\n{ x }").unwrap();

    assert_eq!(tokens[1].location, SourceLocation { column: 3, line: 2 });
    assert_eq!(tokens[2].location, SourceLocation { column: 1, line: 3 });
}

#[test]
fn unexpected_characters_are_reported() {
    assert_eq!(
        tokenize("{ hero % }"),
        Err(RequestPreparationError::UnexpectedCharacter {
            character: '%',
            location: SourceLocation { column: 8, line: 1 },
        }),
    );
}
