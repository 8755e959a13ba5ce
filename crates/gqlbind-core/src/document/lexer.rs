use crate::document::RequestPreparationError;
use crate::document::SourceLocation;
use std::ops::Range;

type Result<T> = std::result::Result<T, RequestPreparationError>;

/// The kind of a token in request document text.
///
/// `&` is lexed as its own punctuator so that bind parameters (`&name`) can be
/// told apart from the surrounding GraphQL syntax.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TokenKind {
    /// `&`
    Ampersand,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `:`
    Colon,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// `$`
    Dollar,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    FloatValue,
    IntValue,
    Name,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `|`
    Pipe,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,
    /// A quoted or block string, including its quotes.
    StringValue,
    Eof,
}
impl TokenKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Ampersand => "`&`",
            Self::At => "`@`",
            Self::Bang => "`!`",
            Self::Colon => "`:`",
            Self::CurlyBraceClose => "`}`",
            Self::CurlyBraceOpen => "`{`",
            Self::Dollar => "`$`",
            Self::Ellipsis => "`...`",
            Self::Equals => "`=`",
            Self::FloatValue => "a float",
            Self::IntValue => "an integer",
            Self::Name => "a name",
            Self::ParenClose => "`)`",
            Self::ParenOpen => "`(`",
            Self::Pipe => "`|`",
            Self::SquareBracketClose => "`]`",
            Self::SquareBracketOpen => "`[`",
            Self::StringValue => "a string",
            Self::Eof => "end of input",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
    /// Byte range of the token in the source text.
    pub span: Range<usize>,
}

/// Split `source` into tokens, skipping whitespace, commas, comments and
/// byte order marks. The last token is always [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token()?;
        let at_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if at_eof {
            return Ok(tokens);
        }
    }
}

struct Lexer<'src> {
    curr_byte_offset: usize,
    curr_column: usize,
    curr_line: usize,
    last_char_was_cr: bool,
    source: &'src str,
}
impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            curr_byte_offset: 0,
            curr_column: 1,
            curr_line: 1,
            last_char_was_cr: false,
            source,
        }
    }

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_location(&self) -> SourceLocation {
        SourceLocation {
            column: self.curr_column,
            line: self.curr_line,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consume the next character, tracking line and column. `\r\n` counts as
    /// a single line terminator.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        match ch {
            '\n' if self.last_char_was_cr => self.last_char_was_cr = false,
            '\n' | '\r' => {
                self.curr_line += 1;
                self.curr_column = 1;
                self.last_char_was_cr = ch == '\r';
            },
            _ => {
                self.curr_column += 1;
                self.last_char_was_cr = false;
            },
        }
        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    fn make_token(&self, kind: TokenKind, start: usize, location: SourceLocation) -> Token {
        Token {
            kind,
            location,
            span: start..self.curr_byte_offset,
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_ignored();

        let start = self.curr_byte_offset;
        let location = self.curr_location();
        let Some(ch) = self.peek_char() else {
            return Ok(self.make_token(TokenKind::Eof, start, location));
        };

        let punctuator = match ch {
            '&' => Some(TokenKind::Ampersand),
            '@' => Some(TokenKind::At),
            '!' => Some(TokenKind::Bang),
            ':' => Some(TokenKind::Colon),
            '}' => Some(TokenKind::CurlyBraceClose),
            '{' => Some(TokenKind::CurlyBraceOpen),
            '$' => Some(TokenKind::Dollar),
            '=' => Some(TokenKind::Equals),
            ')' => Some(TokenKind::ParenClose),
            '(' => Some(TokenKind::ParenOpen),
            '|' => Some(TokenKind::Pipe),
            ']' => Some(TokenKind::SquareBracketClose),
            '[' => Some(TokenKind::SquareBracketOpen),
            _ => None,
        };
        if let Some(kind) = punctuator {
            self.consume();
            return Ok(self.make_token(kind, start, location));
        }

        match ch {
            '.' => {
                if self.remaining().starts_with("...") {
                    for _ in 0..3 {
                        self.consume();
                    }
                    Ok(self.make_token(TokenKind::Ellipsis, start, location))
                } else {
                    Err(RequestPreparationError::UnexpectedCharacter {
                        character: '.',
                        location,
                    })
                }
            },
            '"' => self.lex_string(start, location),
            c if is_name_start(c) => {
                while self.peek_char().is_some_and(is_name_continue) {
                    self.consume();
                }
                Ok(self.make_token(TokenKind::Name, start, location))
            },
            c if c == '-' || c.is_ascii_digit() => self.lex_number(start, location),
            character => Err(RequestPreparationError::UnexpectedCharacter {
                character,
                location,
            }),
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}' => {
                    self.consume();
                },
                '#' => {
                    while self.peek_char().is_some_and(|c| c != '\n' && c != '\r') {
                        self.consume();
                    }
                },
                _ => break,
            }
        }
    }

    fn lex_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
            count += 1;
        }
        count
    }

    fn lex_number(&mut self, start: usize, location: SourceLocation) -> Result<Token> {
        let invalid = |lexer: &Self| RequestPreparationError::InvalidNumber {
            location,
            text: lexer.source[start..lexer.curr_byte_offset].to_string(),
        };

        if self.peek_char() == Some('-') {
            self.consume();
        }
        if self.lex_digits() == 0 {
            return Err(invalid(self));
        }

        let mut kind = TokenKind::IntValue;
        if self.peek_char() == Some('.') {
            self.consume();
            kind = TokenKind::FloatValue;
            if self.lex_digits() == 0 {
                return Err(invalid(self));
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.consume();
            kind = TokenKind::FloatValue;
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if self.lex_digits() == 0 {
                return Err(invalid(self));
            }
        }

        // A number may not run straight into a name or another `.`.
        if self.peek_char().is_some_and(|c| c == '.' || is_name_start(c)) {
            self.consume();
            return Err(invalid(self));
        }
        Ok(self.make_token(kind, start, location))
    }

    fn lex_string(&mut self, start: usize, location: SourceLocation) -> Result<Token> {
        if self.remaining().starts_with("\"\"\"") {
            for _ in 0..3 {
                self.consume();
            }
            loop {
                if self.remaining().starts_with("\\\"\"\"") {
                    for _ in 0..4 {
                        self.consume();
                    }
                } else if self.remaining().starts_with("\"\"\"") {
                    for _ in 0..3 {
                        self.consume();
                    }
                    return Ok(self.make_token(TokenKind::StringValue, start, location));
                } else if self.consume().is_none() {
                    return Err(RequestPreparationError::UnterminatedString { location });
                }
            }
        }

        self.consume();
        loop {
            match self.peek_char() {
                None | Some('\n' | '\r') =>
                    return Err(RequestPreparationError::UnterminatedString { location }),
                Some('"') => {
                    self.consume();
                    return Ok(self.make_token(TokenKind::StringValue, start, location));
                },
                Some('\\') => {
                    self.consume();
                    if self.peek_char_nth(0).is_some_and(|c| c != '\n' && c != '\r') {
                        self.consume();
                    }
                },
                Some(_) => {
                    self.consume();
                },
            }
        }
    }
}

pub(crate) fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

pub(crate) fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}
