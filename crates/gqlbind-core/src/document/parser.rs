use crate::document::lexer;
use crate::document::lexer::Token;
use crate::document::lexer::TokenKind;
use crate::document::RequestPreparationError;
use crate::types::TypeAnnotation;
use crate::OperationKind;
use std::ops::Range;

type Result<T> = std::result::Result<T, RequestPreparationError>;

/// A request document as far as assembly and binding need to understand it.
/// Constant values are not retained; only the positions of variables and bind
/// parameters inside them.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub fragments: Vec<ParsedFragment>,
    pub operation: ParsedOperation,
}

#[derive(Debug)]
pub(crate) struct ParsedOperation {
    pub directives: Vec<ParsedDirective>,
    /// `None` for a fragment without an operation header.
    pub kind: Option<OperationKind>,
    pub name: Option<String>,
    pub selection_set: ParsedSelectionSet,
    pub variables: Vec<ParsedVariableDefinition>,
}

#[derive(Debug)]
pub(crate) struct ParsedFragment {
    pub selection_set: ParsedSelectionSet,
    pub type_condition: String,
}

#[derive(Debug)]
pub(crate) struct ParsedVariableDefinition {
    pub default_value: Option<ParsedValue>,
    pub name: String,
    pub type_annotation: TypeAnnotation,
}

#[derive(Debug)]
pub(crate) struct ParsedSelectionSet {
    /// `false` when the root fields of a fragment were written without
    /// surrounding braces.
    pub braced: bool,
    pub selections: Vec<ParsedSelection>,
    pub span: Range<usize>,
}

#[derive(Debug)]
pub(crate) enum ParsedSelection {
    Field(ParsedField),
    FragmentSpread {
        directives: Vec<ParsedDirective>,
    },
    InlineFragment {
        directives: Vec<ParsedDirective>,
        selection_set: ParsedSelectionSet,
        type_condition: Option<String>,
    },
}

#[derive(Debug)]
pub(crate) struct ParsedField {
    pub alias: Option<String>,
    pub arguments: Vec<ParsedArgument>,
    pub directives: Vec<ParsedDirective>,
    /// Byte offset just past the field's name, arguments and directives; the
    /// point at which a selection set would be inserted.
    pub head_end: usize,
    pub name: String,
    pub selection_set: Option<ParsedSelectionSet>,
}
impl ParsedField {
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name.as_str())
    }
}

#[derive(Debug)]
pub(crate) struct ParsedDirective {
    pub arguments: Vec<ParsedArgument>,
    pub name: String,
}

#[derive(Debug)]
pub(crate) struct ParsedArgument {
    pub name: String,
    pub value: ParsedValue,
}

#[derive(Debug)]
pub(crate) enum ParsedValue {
    BindParameter {
        name: String,
        span: Range<usize>,
    },
    Constant,
    List(Vec<ParsedValue>),
    Object(Vec<(String, ParsedValue)>),
    Variable {
        name: String,
    },
}

pub(crate) struct Parser<'src> {
    pos: usize,
    source: &'src str,
    tokens: Vec<Token>,
}
impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Result<Self> {
        Ok(Self {
            pos: 0,
            source,
            tokens: lexer::tokenize(source)?,
        })
    }

    /// Parse a request document: one operation (possibly without a header, and
    /// possibly without braces around its root fields) followed by any number
    /// of fragment definitions.
    pub fn parse_document(&mut self) -> Result<ParsedDocument> {
        let operation = self.parse_operation()?;

        let mut fragments = vec![];
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Name if self.text(&token) == "fragment" =>
                    fragments.push(self.parse_fragment_definition()?),
                TokenKind::Name if OperationKind::from_keyword(self.text(&token)).is_some() =>
                    return Err(RequestPreparationError::MultipleOperations {
                        location: token.location,
                    }),
                TokenKind::CurlyBraceOpen =>
                    return Err(RequestPreparationError::MultipleOperations {
                        location: token.location,
                    }),
                _ => return Err(self.unexpected("a fragment definition")),
            }
        }

        Ok(ParsedDocument {
            fragments,
            operation,
        })
    }

    /// Parse a standalone type annotation such as `[Episode!]!`.
    pub fn parse_standalone_type(&mut self) -> Result<TypeAnnotation> {
        let annot = self.parse_type_annotation()?;
        self.expect(TokenKind::Eof, "end of input")?;
        Ok(annot)
    }

    fn peek(&self) -> &Token {
        // The token list always ends with `Eof` and `bump()` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_is_name(&self, name: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Name && self.text(token) == name
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn text(&self, token: &Token) -> &'src str {
        &self.source[token.span.clone()]
    }

    /// Byte offset just past the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn unexpected(&self, expected: &str) -> RequestPreparationError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Name | TokenKind::IntValue | TokenKind::FloatValue =>
                format!("`{}`", self.text(token)),
            kind => kind.describe().to_string(),
        };
        RequestPreparationError::UnexpectedToken {
            expected: expected.to_string(),
            found,
            location: token.location,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.peek_kind() == kind {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Expect the token closing a delimiter opened by `open`. Reaching the end
    /// of input first is reported against the opening delimiter.
    fn expect_close(&mut self, kind: TokenKind, open: &Token) -> Result<Token> {
        if self.peek_kind() == TokenKind::Eof {
            return Err(RequestPreparationError::UnclosedDelimiter {
                delimiter: self.text(open).chars().next().unwrap_or('{'),
                location: open.location,
            });
        }
        self.expect(kind, kind.describe())
    }

    fn expect_name(&mut self, expected: &str) -> Result<String> {
        let token = self.expect(TokenKind::Name, expected)?;
        Ok(self.text(&token).to_string())
    }

    fn parse_operation(&mut self) -> Result<ParsedOperation> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Name => {
                let Some(kind) = OperationKind::from_keyword(self.text(&token)) else {
                    // Bare root fields. `fragment` can not start a request.
                    if self.text(&token) == "fragment" {
                        return Err(self.unexpected("an operation or a root field"));
                    }
                    return Ok(ParsedOperation {
                        directives: vec![],
                        kind: None,
                        name: None,
                        selection_set: self.parse_unbraced_root_fields()?,
                        variables: vec![],
                    });
                };
                self.bump();

                let name =
                    if self.peek_kind() == TokenKind::Name {
                        Some(self.expect_name("an operation name")?)
                    } else {
                        None
                    };
                let variables = self.parse_variable_definitions()?;
                let directives = self.parse_directives()?;
                let selection_set = self.parse_selection_set()?;
                Ok(ParsedOperation {
                    directives,
                    kind: Some(kind),
                    name,
                    selection_set,
                    variables,
                })
            },

            TokenKind::CurlyBraceOpen => Ok(ParsedOperation {
                directives: vec![],
                kind: None,
                name: None,
                selection_set: self.parse_selection_set()?,
                variables: vec![],
            }),

            _ => Err(self.unexpected("an operation or a root field")),
        }
    }

    fn parse_unbraced_root_fields(&mut self) -> Result<ParsedSelectionSet> {
        let start = self.peek().span.start;
        let mut selections = vec![];
        while self.peek_kind() == TokenKind::Name && !self.peek_is_name("fragment") {
            selections.push(ParsedSelection::Field(self.parse_field()?));
        }
        if self.peek_kind() == TokenKind::CurlyBraceClose {
            return Err(self.unexpected("a root field"));
        }
        Ok(ParsedSelectionSet {
            braced: false,
            selections,
            span: start..self.prev_end(),
        })
    }

    fn parse_fragment_definition(&mut self) -> Result<ParsedFragment> {
        self.bump();
        if self.peek_is_name("on") {
            return Err(self.unexpected("a fragment name"));
        }
        self.expect_name("a fragment name")?;
        if !self.peek_is_name("on") {
            return Err(self.unexpected("`on`"));
        }
        self.bump();
        let type_condition = self.expect_name("a type condition")?;
        self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        Ok(ParsedFragment {
            selection_set,
            type_condition,
        })
    }

    fn parse_variable_definitions(&mut self) -> Result<Vec<ParsedVariableDefinition>> {
        let mut variables = vec![];
        if self.peek_kind() != TokenKind::ParenOpen {
            return Ok(variables);
        }
        let open = self.bump();
        loop {
            if self.peek_kind() == TokenKind::ParenClose {
                self.bump();
                break;
            }
            if self.peek_kind() == TokenKind::Eof {
                self.expect_close(TokenKind::ParenClose, &open)?;
            }

            self.expect(TokenKind::Dollar, "a variable definition")?;
            let name = self.expect_name("a variable name")?;
            self.expect(TokenKind::Colon, "`:`")?;
            let type_annotation = self.parse_type_annotation()?;
            let default_value =
                if self.peek_kind() == TokenKind::Equals {
                    self.bump();
                    Some(self.parse_value()?)
                } else {
                    None
                };
            self.parse_directives()?;
            variables.push(ParsedVariableDefinition {
                default_value,
                name,
                type_annotation,
            });
        }
        if variables.is_empty() {
            return Err(RequestPreparationError::UnexpectedToken {
                expected: "a variable definition".to_string(),
                found: "`)`".to_string(),
                location: open.location,
            });
        }
        Ok(variables)
    }

    fn parse_type_annotation(&mut self) -> Result<TypeAnnotation> {
        let annot =
            if self.peek_kind() == TokenKind::SquareBracketOpen {
                let open = self.bump();
                let inner = self.parse_type_annotation()?;
                self.expect_close(TokenKind::SquareBracketClose, &open)?;
                TypeAnnotation::list_of(inner)
            } else {
                TypeAnnotation::named(self.expect_name("a type")?)
            };

        if self.peek_kind() == TokenKind::Bang {
            self.bump();
            Ok(annot.non_null())
        } else {
            Ok(annot)
        }
    }

    fn parse_directives(&mut self) -> Result<Vec<ParsedDirective>> {
        let mut directives = vec![];
        while self.peek_kind() == TokenKind::At {
            self.bump();
            let name = self.expect_name("a directive name")?;
            let arguments = self.parse_arguments()?;
            directives.push(ParsedDirective {
                arguments,
                name,
            });
        }
        Ok(directives)
    }

    fn parse_arguments(&mut self) -> Result<Vec<ParsedArgument>> {
        let mut arguments = vec![];
        if self.peek_kind() != TokenKind::ParenOpen {
            return Ok(arguments);
        }
        let open = self.bump();
        loop {
            match self.peek_kind() {
                TokenKind::ParenClose => {
                    self.bump();
                    break;
                },
                TokenKind::Eof => {
                    self.expect_close(TokenKind::ParenClose, &open)?;
                },
                _ => (),
            }
            let name = self.expect_name("an argument name")?;
            self.expect(TokenKind::Colon, "`:`")?;
            let value = self.parse_value()?;
            arguments.push(ParsedArgument {
                name,
                value,
            });
        }
        Ok(arguments)
    }

    fn parse_value(&mut self) -> Result<ParsedValue> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ampersand => {
                self.bump();
                let name_token = self.peek().clone();
                if name_token.kind != TokenKind::Name || name_token.span.start != token.span.end {
                    return Err(RequestPreparationError::InvalidBindParameter {
                        location: token.location,
                    });
                }
                self.bump();
                Ok(ParsedValue::BindParameter {
                    name: self.text(&name_token).to_string(),
                    span: token.span.start..name_token.span.end,
                })
            },

            TokenKind::Dollar => {
                self.bump();
                Ok(ParsedValue::Variable {
                    name: self.expect_name("a variable name")?,
                })
            },

            TokenKind::FloatValue
            | TokenKind::IntValue
            | TokenKind::Name
            | TokenKind::StringValue => {
                self.bump();
                Ok(ParsedValue::Constant)
            },

            TokenKind::SquareBracketOpen => {
                self.bump();
                let mut items = vec![];
                while self.peek_kind() != TokenKind::SquareBracketClose {
                    if self.peek_kind() == TokenKind::Eof {
                        self.expect_close(TokenKind::SquareBracketClose, &token)?;
                    }
                    items.push(self.parse_value()?);
                }
                self.bump();
                Ok(ParsedValue::List(items))
            },

            TokenKind::CurlyBraceOpen => {
                self.bump();
                let mut fields = vec![];
                while self.peek_kind() != TokenKind::CurlyBraceClose {
                    if self.peek_kind() == TokenKind::Eof {
                        self.expect_close(TokenKind::CurlyBraceClose, &token)?;
                    }
                    let name = self.expect_name("an input field name")?;
                    self.expect(TokenKind::Colon, "`:`")?;
                    fields.push((name, self.parse_value()?));
                }
                self.bump();
                Ok(ParsedValue::Object(fields))
            },

            _ => Err(self.unexpected("a value")),
        }
    }

    fn parse_selection_set(&mut self) -> Result<ParsedSelectionSet> {
        let open = self.expect(TokenKind::CurlyBraceOpen, "`{`")?;
        let mut selections = vec![];
        loop {
            match self.peek_kind() {
                TokenKind::CurlyBraceClose => break,
                TokenKind::Eof => {
                    self.expect_close(TokenKind::CurlyBraceClose, &open)?;
                },
                TokenKind::Ellipsis => selections.push(self.parse_fragment_selection()?),
                _ => selections.push(ParsedSelection::Field(self.parse_field()?)),
            }
        }
        let close = self.bump();
        if selections.is_empty() {
            return Err(RequestPreparationError::UnexpectedToken {
                expected: "a selection".to_string(),
                found: "`}`".to_string(),
                location: close.location,
            });
        }
        Ok(ParsedSelectionSet {
            braced: true,
            selections,
            span: open.span.start..close.span.end,
        })
    }

    fn parse_fragment_selection(&mut self) -> Result<ParsedSelection> {
        self.bump();
        let is_spread =
            self.peek_kind() == TokenKind::Name && !self.peek_is_name("on");
        if is_spread {
            self.bump();
            return Ok(ParsedSelection::FragmentSpread {
                directives: self.parse_directives()?,
            });
        }

        let type_condition =
            if self.peek_is_name("on") {
                self.bump();
                Some(self.expect_name("a type condition")?)
            } else {
                None
            };
        let directives = self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        Ok(ParsedSelection::InlineFragment {
            directives,
            selection_set,
            type_condition,
        })
    }

    fn parse_field(&mut self) -> Result<ParsedField> {
        let first = self.expect_name("a field")?;
        let (alias, name) =
            if self.peek_kind() == TokenKind::Colon && self.peek_nth(1).kind == TokenKind::Name {
                self.bump();
                (Some(first), self.expect_name("a field")?)
            } else {
                (None, first)
            };
        let arguments = self.parse_arguments()?;
        let directives = self.parse_directives()?;
        let head_end = self.prev_end();
        let selection_set =
            if self.peek_kind() == TokenKind::CurlyBraceOpen {
                Some(self.parse_selection_set()?)
            } else {
                None
            };
        Ok(ParsedField {
            alias,
            arguments,
            directives,
            head_end,
            name,
            selection_set,
        })
    }
}
