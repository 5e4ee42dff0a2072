//! DDL Parser implementation.

use tracing::{debug, trace};

use super::error::ParseError;
use super::pratt::{infix_precedence, token_to_binary_op, token_to_unary_op, Precedence};
use crate::ast::{
    AlterSequenceOwnedBy, AlterTable, AlterTableAction, BinaryOp, ColumnConstraint,
    ColumnDefinition, ConstraintKind, CreateIndex, CreateSchema, CreateSequence, CreateTable,
    DataDefinition, DataType, Expression, Identifier, IndexTarget, OrderDirection, SequenceName,
    SetSearchPath, Statement, TableConstraint, TableName,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// The result of parsing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    /// A statement the diff engine understands.
    Parsed(Statement),
    /// A recognized statement with no bearing on the schema diff
    /// (`GRANT`, `CREATE FUNCTION`, `\connect`, ...).
    Skipped,
    /// A syntax error. Parsing resumes after the next `;`.
    Failed(ParseError),
}

/// Returns the data type named by a keyword that takes no modifiers.
const fn simple_type(keyword: Keyword) -> Option<DataType> {
    let data_type = match keyword {
        Keyword::Smallint => DataType::Smallint,
        Keyword::Integer => DataType::Integer,
        Keyword::Bigint => DataType::Bigint,
        Keyword::Serial => DataType::Serial,
        Keyword::Bigserial => DataType::Bigserial,
        Keyword::Text => DataType::Text,
        Keyword::Boolean => DataType::Boolean,
        Keyword::Bytea => DataType::Bytea,
        Keyword::Jsonb => DataType::Jsonb,
        Keyword::Tsvector => DataType::Tsvector,
        Keyword::Uuid => DataType::Uuid,
        Keyword::Date => DataType::Date,
        _ => return None,
    };
    Some(data_type)
}

/// Type names that show up written as quoted identifiers (`"text"`).
fn quoted_type(literal: &str) -> Option<DataType> {
    let data_type = match literal {
        r#""date""# => DataType::Date,
        r#""text""# => DataType::Text,
        r#""jsonb""# => DataType::Jsonb,
        r#""bytea""# => DataType::Bytea,
        r#""tsvector""# => DataType::Tsvector,
        r#""uuid""# => DataType::Uuid,
        r#""integer""# => DataType::Integer,
        r#""bigint""# => DataType::Bigint,
        r#""smallint""# => DataType::Smallint,
        r#""boolean""# => DataType::Boolean,
        r#""numeric""# => DataType::Numeric {
            precision: None,
            scale: None,
        },
        _ => return None,
    };
    Some(data_type)
}

/// PostgreSQL DDL parser.
///
/// Statements are parsed one at a time; a statement with a syntax error is
/// recorded and skipped up to the next `;` so the rest of the document is
/// still parsed.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    input_name: String,
    current: Token,
    peek: Token,
    /// Set once the lexer stopped at an unterminated string, quoted
    /// identifier or block comment.
    truncated: bool,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input. `input_name` is used in
    /// error messages.
    #[must_use]
    pub fn new(input_name: impl Into<String>, input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        let truncated = current.kind == TokenKind::Illegal && lexer.is_finished();
        let peek = lexer.next_token();
        Self {
            lexer,
            input_name: input_name.into(),
            current,
            peek,
            truncated,
            errors: Vec::new(),
        }
    }

    /// Parses the whole input.
    ///
    /// Statements that fail to parse are left out of the result; their
    /// errors are available through [`Parser::errors`].
    pub fn parse_data_definition(&mut self) -> DataDefinition {
        let mut statements = Vec::new();
        while !self.current.is_eof() {
            match self.parse_statement() {
                StatementOutcome::Parsed(statement) => statements.push(statement),
                StatementOutcome::Skipped => {}
                StatementOutcome::Failed(error) => self.errors.push(error),
            }
        }
        DataDefinition { statements }
    }

    /// Returns the errors collected by [`Parser::parse_data_definition`].
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consumes the parser, returning the collected errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parses one statement and moves past its terminating `;`.
    pub fn parse_statement(&mut self) -> StatementOutcome {
        trace!(
            input = %self.input_name,
            line = self.current.line,
            token = %self.current.literal,
            "Parsing statement"
        );

        // A meta-command ends at the newline, not at `;`.
        if self.check(TokenKind::MetaCommand) {
            debug!(
                input = %self.input_name,
                line = self.current.line,
                command = %self.current.literal,
                "Skipping meta-command"
            );
            self.advance();
            return StatementOutcome::Skipped;
        }

        let outcome = match self.dispatch() {
            Ok(StatementOutcome::Parsed(statement)) => match self.expect_statement_end() {
                Ok(()) => StatementOutcome::Parsed(statement),
                Err(error) => StatementOutcome::Failed(error),
            },
            Ok(outcome) => outcome,
            Err(error) => StatementOutcome::Failed(error),
        };
        match (outcome, self.synchronize()) {
            (StatementOutcome::Failed(error), _) | (_, Some(error)) => {
                StatementOutcome::Failed(error)
            }
            (outcome, None) => outcome,
        }
    }

    /// Routes on the leading keyword.
    fn dispatch(&mut self) -> Result<StatementOutcome, ParseError> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Alter) => self.parse_alter(),
            TokenKind::Keyword(Keyword::Set) => self.parse_set(),
            TokenKind::Keyword(
                Keyword::Grant | Keyword::Revoke | Keyword::Select | Keyword::Comment,
            ) => Ok(self.skip(self.current.literal.to_ascii_uppercase())),
            TokenKind::Semicolon => Ok(StatementOutcome::Skipped),
            TokenKind::Illegal => Err(ParseError::illegal(&self.input_name, &self.current)),
            _ => Err(self.error(format!("unknown statement {}", self.current.describe()))),
        }
    }

    fn parse_create(&mut self) -> Result<StatementOutcome, ParseError> {
        let statement = match self.peek.kind {
            TokenKind::Keyword(Keyword::Schema) => {
                Statement::CreateSchema(self.parse_create_schema()?)
            }
            TokenKind::Keyword(Keyword::Table) => Statement::CreateTable(self.parse_create_table()?),
            TokenKind::Keyword(Keyword::Unique | Keyword::Index) => {
                Statement::CreateIndex(self.parse_create_index()?)
            }
            TokenKind::Keyword(Keyword::Sequence) => {
                Statement::CreateSequence(self.parse_create_sequence()?)
            }
            TokenKind::Keyword(
                Keyword::Database
                | Keyword::Extension
                | Keyword::Function
                | Keyword::View
                | Keyword::Operator
                | Keyword::Trigger
                | Keyword::Role,
            ) => {
                return Ok(self.skip(format!("CREATE {}", self.peek.literal.to_ascii_uppercase())));
            }
            _ => {
                return Err(ParseError::new(
                    &self.input_name,
                    self.peek.line,
                    format!("unknown statement CREATE {}", self.peek.describe()),
                ))
            }
        };
        Ok(StatementOutcome::Parsed(statement))
    }

    fn parse_alter(&mut self) -> Result<StatementOutcome, ParseError> {
        match self.peek.kind {
            TokenKind::Keyword(Keyword::Table) => self.parse_alter_table(),
            TokenKind::Keyword(Keyword::Sequence) => self.parse_alter_sequence(),
            _ => Ok(self.skip(format!("ALTER {}", self.peek.literal.to_ascii_uppercase()))),
        }
    }

    /// Parses `CREATE SCHEMA name`.
    fn parse_create_schema(&mut self) -> Result<CreateSchema, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Schema)?;
        let name = self.expect_identifier()?;
        Ok(CreateSchema { name })
    }

    /// Parses `CREATE TABLE name (column, ...)`.
    fn parse_create_table(&mut self) -> Result<CreateTable, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table_name = self.parse_table_name()?;

        self.expect(TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                columns.push(self.parse_column_definition()?);
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        Ok(CreateTable {
            table_name,
            columns,
        })
    }

    /// Parses `name data_type [NOT NULL | NULL | DEFAULT expr]...`.
    fn parse_column_definition(&mut self) -> Result<ColumnDefinition, ParseError> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        let mut constraints = Vec::new();

        loop {
            if self.consume_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                constraints.push(ColumnConstraint::NotNull);
            } else if self.consume_keyword(Keyword::Null) {
                constraints.push(ColumnConstraint::Null);
            } else if self.consume_keyword(Keyword::Default) {
                let expr = self.parse_expression(Precedence::Lowest)?;
                constraints.push(ColumnConstraint::Default(expr));
            } else {
                break;
            }
        }

        Ok(ColumnDefinition {
            name,
            data_type,
            constraints,
        })
    }

    /// Returns true if the current token starts a built-in type name.
    fn at_type_name(&self) -> bool {
        self.current.as_keyword().is_some_and(|kw| {
            simple_type(kw).is_some()
                || matches!(kw, Keyword::Character | Keyword::Numeric | Keyword::Timestamp)
        })
    }

    /// Parses a data type.
    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Character) => {
                self.advance();
                let varying = self.consume_keyword(Keyword::Varying);
                let length = if self.consume(TokenKind::LeftParen) {
                    let length = self.parse_unsigned()?;
                    self.expect(TokenKind::RightParen)?;
                    Some(length)
                } else {
                    None
                };
                Ok(DataType::Character { varying, length })
            }
            TokenKind::Keyword(Keyword::Numeric) => {
                self.advance();
                let (mut precision, mut scale) = (None, None);
                if self.consume(TokenKind::LeftParen) {
                    precision = Some(self.parse_unsigned()?);
                    if self.consume(TokenKind::Comma) {
                        scale = Some(self.parse_unsigned()?);
                    }
                    self.expect(TokenKind::RightParen)?;
                }
                Ok(DataType::Numeric { precision, scale })
            }
            TokenKind::Keyword(Keyword::Timestamp) => {
                self.advance();
                let with_time_zone = if self.consume_keyword(Keyword::With) {
                    true
                } else if self.consume_keyword(Keyword::Without) {
                    false
                } else {
                    return Ok(DataType::Timestamp {
                        with_time_zone: false,
                    });
                };
                self.expect_keyword(Keyword::Time)?;
                self.expect_keyword(Keyword::Zone)?;
                Ok(DataType::Timestamp { with_time_zone })
            }
            TokenKind::Keyword(kw) => match simple_type(kw) {
                Some(data_type) => {
                    self.advance();
                    Ok(data_type)
                }
                None => Err(self.unexpected("data type")),
            },
            TokenKind::Identifier => match quoted_type(&self.current.literal) {
                Some(data_type) => {
                    self.advance();
                    Ok(data_type)
                }
                None => Err(self.error(format!("unknown data type {}", self.current.literal))),
            },
            _ => Err(self.unexpected("data type")),
        }
    }

    /// Parses `CREATE [UNIQUE] INDEX [CONCURRENTLY] [IF NOT EXISTS] [name]
    /// ON table [USING method] (target, ...)`.
    fn parse_create_index(&mut self) -> Result<CreateIndex, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        let unique = self.consume_keyword(Keyword::Unique);
        self.expect_keyword(Keyword::Index)?;
        let concurrently = self.consume_keyword(Keyword::Concurrently);
        let if_not_exists = self.parse_if_not_exists()?;
        let name = if self.check_keyword(Keyword::On) {
            None
        } else {
            Some(self.expect_identifier()?)
        };
        self.expect_keyword(Keyword::On)?;
        let table_name = self.parse_table_name()?;
        let using = if self.consume_keyword(Keyword::Using) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        self.expect(TokenKind::LeftParen)?;
        let mut targets = vec![self.parse_index_target()?];
        while self.consume(TokenKind::Comma) {
            targets.push(self.parse_index_target()?);
        }
        self.expect(TokenKind::RightParen)?;

        Ok(CreateIndex {
            unique,
            concurrently,
            if_not_exists,
            name,
            table_name,
            using,
            targets,
        })
    }

    /// Parses a column, a function call such as `lower(name)`, or a
    /// parenthesized expression, followed by an optional `ASC`/`DESC`.
    fn parse_index_target(&mut self) -> Result<IndexTarget, ParseError> {
        let expr = if self.check(TokenKind::LeftParen) {
            self.parse_prefix()?
        } else if self.current.is_identifier() {
            let ident = self.expect_identifier()?;
            if self.check(TokenKind::LeftParen) {
                let args = self.parse_call_arguments()?;
                Expression::call(Expression::Identifier(ident), args)
            } else {
                Expression::Identifier(ident)
            }
        } else {
            return Err(self.unexpected("index column or expression"));
        };

        let direction = if self.consume_keyword(Keyword::Desc) {
            OrderDirection::Desc
        } else {
            self.consume_keyword(Keyword::Asc);
            OrderDirection::Asc
        };

        Ok(IndexTarget { expr, direction })
    }

    /// Parses `CREATE SEQUENCE name [option...]`.
    fn parse_create_sequence(&mut self) -> Result<CreateSequence, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Sequence)?;
        let mut sequence = CreateSequence::new(self.parse_sequence_name()?);

        while !self.check(TokenKind::Semicolon) && !self.current.is_eof() {
            match self.current.as_keyword() {
                Some(Keyword::As) => {
                    self.advance();
                    sequence.data_type = Some(self.parse_data_type()?);
                }
                Some(Keyword::Start) => {
                    self.advance();
                    self.consume_keyword(Keyword::With);
                    sequence.start_with = Some(self.parse_integer()?);
                }
                Some(Keyword::Increment) => {
                    self.advance();
                    self.consume_keyword(Keyword::By);
                    sequence.increment_by = Some(self.parse_integer()?);
                }
                Some(Keyword::No) => {
                    self.advance();
                    if self.consume_keyword(Keyword::Minvalue) {
                        sequence.no_minvalue = true;
                    } else if self.consume_keyword(Keyword::Maxvalue) {
                        sequence.no_maxvalue = true;
                    } else {
                        return Err(self.unexpected("MINVALUE or MAXVALUE"));
                    }
                }
                Some(Keyword::Cache) => {
                    self.advance();
                    sequence.cache = Some(self.parse_integer()?);
                }
                _ => return Err(self.unexpected("sequence option")),
            }
        }

        Ok(sequence)
    }

    /// Parses `ALTER SEQUENCE name OWNED BY [schema.]table.column`.
    fn parse_alter_sequence(&mut self) -> Result<StatementOutcome, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Sequence)?;
        let sequence_name = self.parse_sequence_name()?;

        if self.check_keyword(Keyword::Owner) {
            return Ok(self.skip("ALTER SEQUENCE OWNER TO"));
        }

        self.expect_keyword(Keyword::Owned)?;
        self.expect_keyword(Keyword::By)?;
        let first = self.expect_identifier()?;
        self.expect(TokenKind::Dot)?;
        let second = self.expect_identifier()?;
        let (table_name, column) = if self.consume(TokenKind::Dot) {
            (TableName::qualified(first, second), self.expect_identifier()?)
        } else {
            (TableName::new(first), second)
        };

        Ok(StatementOutcome::Parsed(Statement::AlterSequenceOwnedBy(
            AlterSequenceOwnedBy {
                sequence_name,
                table_name,
                column,
            },
        )))
    }

    /// Parses `ALTER TABLE [ONLY] name action, ...`.
    fn parse_alter_table(&mut self) -> Result<StatementOutcome, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let only = self.consume_keyword(Keyword::Only);
        let table_name = self.parse_table_name()?;

        if self.check_keyword(Keyword::Owner) {
            return Ok(self.skip("ALTER TABLE OWNER TO"));
        }

        let mut actions = Vec::new();
        loop {
            match self.current.as_keyword() {
                Some(Keyword::Add) => {
                    self.advance();
                    match self.parse_table_constraint()? {
                        Some(constraint) => actions.push(AlterTableAction::AddConstraint(constraint)),
                        None => self.skip_action()?,
                    }
                }
                Some(Keyword::Alter) => {
                    self.advance();
                    self.consume_keyword(Keyword::Column);
                    let column = self.expect_identifier()?;
                    self.expect_keyword(Keyword::Set)?;
                    self.expect_keyword(Keyword::Default)?;
                    let expr = self.parse_expression(Precedence::Lowest)?;
                    actions.push(AlterTableAction::AlterColumnSetDefault { column, expr });
                }
                _ => return Err(self.unexpected("ADD or ALTER")),
            }
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }

        if actions.is_empty() {
            return Ok(self.skip("ALTER TABLE ADD CONSTRAINT"));
        }
        Ok(StatementOutcome::Parsed(Statement::AlterTable(AlterTable {
            only,
            table_name,
            actions,
        })))
    }

    /// Skips an `ALTER TABLE` action the diff ignores, up to the `,` that
    /// starts the next action or the end of the statement.
    fn skip_action(&mut self) -> Result<(), ParseError> {
        debug!(
            input = %self.input_name,
            line = self.current.line,
            kind = %self.current.literal,
            "Skipping table constraint"
        );
        let mut depth = 0usize;
        while !self.check(TokenKind::Semicolon) && !self.current.is_eof() {
            if self.at_fatal_illegal() {
                return Err(ParseError::illegal(&self.input_name, &self.current));
            }
            match self.current.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                TokenKind::Comma if depth == 0 => break,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    /// Parses `[CONSTRAINT name] {UNIQUE | PRIMARY KEY} (column, ...)`.
    ///
    /// Returns `None` for constraint kinds the diff ignores (`FOREIGN KEY`,
    /// `CHECK`, `EXCLUDE`), leaving the current token on the constraint
    /// keyword.
    fn parse_table_constraint(&mut self) -> Result<Option<TableConstraint>, ParseError> {
        let name = if self.consume_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let kind = match self.current.as_keyword() {
            Some(Keyword::Unique) => {
                self.advance();
                ConstraintKind::Unique
            }
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                ConstraintKind::PrimaryKey
            }
            Some(Keyword::Foreign | Keyword::Check | Keyword::Exclude) => return Ok(None),
            _ => return Err(self.unexpected("UNIQUE or PRIMARY KEY")),
        };

        let columns = self.parse_identifier_list()?;
        Ok(Some(TableConstraint {
            name,
            kind,
            columns,
        }))
    }

    /// Parses `SET search_path {= | TO} value, ...`; other parameters are
    /// skipped.
    fn parse_set(&mut self) -> Result<StatementOutcome, ParseError> {
        self.expect_keyword(Keyword::Set)?;

        let is_search_path = self.current.is_identifier()
            && Identifier::from_literal(&self.current.literal)
                .as_str()
                .eq_ignore_ascii_case("search_path");
        if !is_search_path {
            debug!(
                input = %self.input_name,
                line = self.current.line,
                parameter = %self.current.literal,
                "Ignoring SET parameter"
            );
            return Ok(StatementOutcome::Skipped);
        }
        self.advance();

        if !self.consume(TokenKind::Equal) && !self.consume_keyword(Keyword::To) {
            return Err(self.unexpected("= or TO"));
        }

        let mut values = vec![self.parse_expression(Precedence::Lowest)?];
        while self.consume(TokenKind::Comma) {
            values.push(self.parse_expression(Precedence::Lowest)?);
        }

        Ok(StatementOutcome::Parsed(Statement::SetSearchPath(
            SetSearchPath { values },
        )))
    }

    /// Parses an expression with precedence climbing.
    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression, ParseError> {
        let mut left = self.parse_prefix()?;

        while let Some(next) = infix_precedence(&self.current.kind) {
            if next <= precedence {
                break;
            }
            left = self.parse_infix(left, next)?;
        }

        Ok(left)
    }

    /// Parses a literal, identifier, grouped expression or prefix operator.
    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        let expr = match self.current.kind {
            TokenKind::String => Expression::String(self.current.literal.clone()),
            TokenKind::Number => Expression::Number(self.current.literal.clone()),
            TokenKind::Keyword(Keyword::True) => Expression::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Expression::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Expression::Null,
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression(Precedence::Lowest)?;
                self.expect(TokenKind::RightParen)?;
                return Ok(Expression::Grouped(Box::new(inner)));
            }
            kind => {
                if let Some(op) = token_to_unary_op(&kind) {
                    self.advance();
                    let operand = self.parse_expression(Precedence::Prefix)?;
                    return Ok(Expression::Prefix {
                        op,
                        operand: Box::new(operand),
                    });
                }
                if !self.current.is_identifier() {
                    return Err(self.unexpected("expression"));
                }
                Expression::Identifier(Identifier::from_literal(&self.current.literal))
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Parses the operator at the current token and its right operand.
    fn parse_infix(
        &mut self,
        left: Expression,
        precedence: Precedence,
    ) -> Result<Expression, ParseError> {
        match self.current.kind {
            TokenKind::LeftParen => {
                let args = self.parse_call_arguments()?;
                Ok(Expression::call(left, args))
            }
            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                let op = if self.consume_keyword(Keyword::Not) {
                    BinaryOp::IsNot
                } else {
                    BinaryOp::Is
                };
                let right = self.parse_expression(precedence)?;
                Ok(Expression::infix(left, op, right))
            }
            TokenKind::Typecast => {
                self.advance();
                let right = if self.at_type_name() {
                    Expression::Type(self.parse_data_type()?)
                } else {
                    self.parse_expression(precedence)?
                };
                Ok(Expression::infix(left, BinaryOp::Typecast, right))
            }
            kind => {
                let op = token_to_binary_op(&kind).ok_or_else(|| self.unexpected("operator"))?;
                self.advance();
                let right = self.parse_expression(precedence)?;
                Ok(Expression::infix(left, op, right))
            }
        }
    }

    /// Parses `(arg, ...)` after a callee.
    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression(Precedence::Lowest)?);
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(args)
    }

    /// Parses `table` or `schema.table`.
    fn parse_table_name(&mut self) -> Result<TableName, ParseError> {
        let first = self.expect_identifier()?;
        if self.consume(TokenKind::Dot) {
            Ok(TableName::qualified(first, self.expect_identifier()?))
        } else {
            Ok(TableName::new(first))
        }
    }

    /// Parses `sequence` or `schema.sequence`.
    fn parse_sequence_name(&mut self) -> Result<SequenceName, ParseError> {
        let first = self.expect_identifier()?;
        if self.consume(TokenKind::Dot) {
            Ok(SequenceName {
                schema: Some(first),
                name: self.expect_identifier()?,
            })
        } else {
            Ok(SequenceName::new(first))
        }
    }

    /// Parses `(ident, ...)`.
    fn parse_identifier_list(&mut self) -> Result<Vec<Identifier>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut idents = vec![self.expect_identifier()?];
        while self.consume(TokenKind::Comma) {
            idents.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(idents)
    }

    /// Parses an optional `IF NOT EXISTS`.
    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if !self.consume_keyword(Keyword::If) {
            return Ok(false);
        }
        self.expect_keyword(Keyword::Not)?;
        self.expect_keyword(Keyword::Exists)?;
        Ok(true)
    }

    /// Parses an optionally negative integer.
    fn parse_integer(&mut self) -> Result<i64, ParseError> {
        let negative = self.consume(TokenKind::Minus);
        if !self.check(TokenKind::Number) {
            return Err(self.unexpected("integer"));
        }
        let value: i64 = self
            .current
            .literal
            .parse()
            .map_err(|_| self.error(format!("invalid integer {}", self.current.literal)))?;
        self.advance();
        Ok(if negative { -value } else { value })
    }

    /// Parses a type modifier such as the `50` in `character varying(50)`.
    fn parse_unsigned(&mut self) -> Result<u32, ParseError> {
        if !self.check(TokenKind::Number) {
            return Err(self.unexpected("number"));
        }
        let value = self
            .current
            .literal
            .parse()
            .map_err(|_| self.error(format!("invalid type modifier {}", self.current.literal)))?;
        self.advance();
        Ok(value)
    }

    /// Checks that the statement ends here.
    fn expect_statement_end(&self) -> Result<(), ParseError> {
        if self.check(TokenKind::Semicolon) || self.current.is_eof() {
            Ok(())
        } else {
            Err(self.unexpected(";"))
        }
    }

    /// Skips to just past the next `;`, or to the end of input.
    ///
    /// Returns an error if an unterminated construct was skipped over: the
    /// rest of the input is gone, so the statement cannot count as skipped.
    fn synchronize(&mut self) -> Option<ParseError> {
        let mut fatal = None;
        while !self.check(TokenKind::Semicolon) && !self.current.is_eof() {
            if self.at_fatal_illegal() {
                fatal = Some(ParseError::illegal(&self.input_name, &self.current));
            }
            self.advance();
        }
        self.consume(TokenKind::Semicolon);
        fatal
    }

    /// Checks if the current token is the `Illegal` token that ended the
    /// token stream.
    fn at_fatal_illegal(&self) -> bool {
        // a fatal token is always the last one before `Eof`
        self.truncated && self.check(TokenKind::Illegal) && self.peek.is_eof()
    }

    /// Logs and reports a statement the diff has no use for.
    fn skip(&self, statement: impl AsRef<str>) -> StatementOutcome {
        debug!(
            input = %self.input_name,
            line = self.current.line,
            statement = statement.as_ref(),
            "Skipping unsupported statement"
        );
        StatementOutcome::Skipped
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        let next = self.lexer.next_token();
        if next.kind == TokenKind::Illegal && self.lexer.is_finished() {
            self.truncated = true;
        }
        self.current = core::mem::replace(&mut self.peek, next);
    }

    /// Checks if the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    /// Advances past the current token if it is of the given kind.
    fn consume(&mut self, kind: TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Advances past the current token if it is the given keyword.
    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        self.consume(TokenKind::Keyword(keyword))
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier (or a non-reserved keyword used as
    /// one).
    fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        if !self.current.is_identifier() {
            return Err(self.unexpected("identifier"));
        }
        let ident = Identifier::from_literal(&self.current.literal);
        self.advance();
        Ok(ident)
    }

    /// Creates an error at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(&self.input_name, self.current.line, message)
    }

    /// Creates an "expected X" error at the current token, or an illegal
    /// token error if the lexer gave up there.
    fn unexpected(&self, expected: &str) -> ParseError {
        if self.check(TokenKind::Illegal) {
            ParseError::illegal(&self.input_name, &self.current)
        } else {
            ParseError::unexpected(&self.input_name, expected, &self.current)
        }
    }
}
