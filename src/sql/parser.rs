//! SQL Parser
//!
//! This module parses schema-script tokens into an AST.

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::catalog::DataType;
use crate::error::{Error, Result};

/// SQL Parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from a SQL string
    pub fn new(sql: &str) -> Result<Self> {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse a single SQL statement
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = self.parse_statement()?;

        if self.check(&Token::Semicolon) {
            self.advance();
        } else if !self.is_at_end() {
            return Err(Error::UnexpectedToken {
                expected: "';'".to_string(),
                found: format!("{}", self.current()),
            });
        }

        Ok(stmt)
    }

    /// Parse every statement of a script
    pub fn parse_all(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();

        loop {
            // Stray semicolons separate nothing
            while self.check(&Token::Semicolon) {
                self.advance();
            }
            if self.is_at_end() {
                break;
            }
            statements.push(self.parse()?);
        }

        Ok(statements)
    }

    /// Parse a single statement
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current() {
            Token::Create => self.parse_create(),
            Token::Drop => self.parse_drop(),
            Token::Use => {
                self.advance();
                self.expect_identifier().map(Statement::Use)
            }
            Token::Eof => Err(Error::UnexpectedEof("a statement".to_string())),
            _ => Err(Error::UnexpectedToken {
                expected: "CREATE, DROP, or USE".to_string(),
                found: format!("{}", self.current()),
            }),
        }
    }

    // ========== CREATE Statement ==========

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect(&Token::Create)?;

        match self.current() {
            Token::Database | Token::Schema => {
                self.advance();
                let if_not_exists = self.parse_if_not_exists()?;
                let name = self.expect_identifier()?;
                Ok(Statement::CreateDatabase(CreateDatabaseStatement {
                    name,
                    if_not_exists,
                }))
            }
            Token::Table => self.parse_create_table().map(Statement::CreateTable),
            Token::Index | Token::Unique => Err(Error::Unsupported("CREATE INDEX".to_string())),
            _ => Err(Error::UnexpectedToken {
                expected: "DATABASE or TABLE".to_string(),
                found: format!("{}", self.current()),
            }),
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool> {
        if self.check(&Token::If) {
            self.advance();
            self.expect(&Token::Not)?;
            self.expect(&Token::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool> {
        if self.check(&Token::If) {
            self.advance();
            self.expect(&Token::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table(&mut self) -> Result<CreateTableStatement> {
        self.expect(&Token::Table)?;

        let if_not_exists = self.parse_if_not_exists()?;
        let table_name = self.expect_identifier()?;

        self.expect(&Token::LParen)?;

        let mut columns: Vec<ColumnDef> = Vec::new();
        let mut table_primary_key = None;

        loop {
            match self.current() {
                Token::Primary => {
                    self.advance();
                    self.expect(&Token::Key)?;
                    self.expect(&Token::LParen)?;
                    let key_columns = self.parse_identifier_list()?;
                    self.expect(&Token::RParen)?;
                    if key_columns.len() != 1 {
                        return Err(Error::Unsupported("composite primary keys".to_string()));
                    }
                    if table_primary_key.is_some() {
                        return Err(Error::InvalidSchema(
                            table_name,
                            "multiple primary keys defined".to_string(),
                        ));
                    }
                    table_primary_key = key_columns.into_iter().next();
                }
                Token::Foreign
                | Token::Unique
                | Token::Check
                | Token::Constraint
                | Token::Index
                | Token::Key => {
                    return Err(Error::Unsupported(format!(
                        "{} table constraints",
                        self.current()
                    )));
                }
                _ => columns.push(self.parse_column_def()?),
            }

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RParen)?;
        self.parse_table_options()?;

        if let Some(key) = table_primary_key {
            let column = columns
                .iter_mut()
                .find(|c| c.name == key)
                .ok_or_else(|| Error::ColumnNotFound(key.clone(), table_name.clone()))?;
            column.primary_key = true;
            column.not_null = true;
        }

        Ok(CreateTableStatement {
            table_name,
            columns,
            if_not_exists,
        })
    }

    /// Accept and ignore `ENGINE [=] name`
    fn parse_table_options(&mut self) -> Result<()> {
        while self.check(&Token::Engine) {
            self.advance();
            if self.check(&Token::Eq) {
                self.advance();
            }
            self.expect_identifier()?;
        }
        Ok(())
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;

        let mut not_null = false;
        let mut primary_key = false;
        let mut auto_increment = false;

        // Parse column constraints
        loop {
            match self.current() {
                Token::Not => {
                    self.advance();
                    self.expect(&Token::Null)?;
                    not_null = true;
                }
                Token::Null => {
                    self.advance();
                }
                Token::Primary => {
                    self.advance();
                    self.expect(&Token::Key)?;
                    primary_key = true;
                    not_null = true;
                }
                Token::AutoIncrement => {
                    self.advance();
                    auto_increment = true;
                }
                Token::Default | Token::Unique | Token::Check | Token::References => {
                    return Err(Error::Unsupported(format!(
                        "{} column constraints",
                        self.current()
                    )));
                }
                _ => break,
            }
        }

        Ok(ColumnDef {
            name,
            data_type,
            not_null,
            primary_key,
            auto_increment,
        })
    }

    fn parse_data_type(&mut self) -> Result<DataType> {
        let dt = match self.current() {
            Token::Int | Token::Integer => {
                self.advance();
                self.skip_display_width()?;
                DataType::Integer
            }
            Token::BigInt => {
                self.advance();
                self.skip_display_width()?;
                DataType::BigInt
            }
            Token::Varchar => {
                self.advance();
                DataType::Varchar(self.parse_length()?)
            }
            Token::Char => {
                self.advance();
                if self.check(&Token::LParen) {
                    DataType::Char(self.parse_length()?)
                } else {
                    DataType::Char(1)
                }
            }
            Token::Text => {
                self.advance();
                DataType::Text
            }
            _ => {
                return Err(Error::UnexpectedToken {
                    expected: "data type".to_string(),
                    found: format!("{}", self.current()),
                });
            }
        };

        Ok(dt)
    }

    /// `(n)` after a string type
    fn parse_length(&mut self) -> Result<usize> {
        self.expect(&Token::LParen)?;
        let len = self.expect_integer()?;
        self.expect(&Token::RParen)?;
        usize::try_from(len).map_err(|_| Error::UnexpectedToken {
            expected: "a non-negative length".to_string(),
            found: len.to_string(),
        })
    }

    /// MySQL's `INT(11)` display width carries no meaning
    fn skip_display_width(&mut self) -> Result<()> {
        if self.check(&Token::LParen) {
            self.parse_length()?;
        }
        Ok(())
    }

    // ========== DROP Statement ==========

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect(&Token::Drop)?;

        match self.current() {
            Token::Database | Token::Schema => {
                self.advance();
                let if_exists = self.parse_if_exists()?;
                let name = self.expect_identifier()?;
                Ok(Statement::DropDatabase(DropDatabaseStatement { name, if_exists }))
            }
            Token::Table => {
                self.advance();
                let if_exists = self.parse_if_exists()?;
                let table_name = self.expect_identifier()?;

                Ok(Statement::DropTable(DropTableStatement {
                    table_name,
                    if_exists,
                }))
            }
            _ => Err(Error::UnexpectedToken {
                expected: "DATABASE or TABLE".to_string(),
                found: format!("{}", self.current()),
            }),
        }
    }

    // ========== Helpers ==========

    fn parse_identifier_list(&mut self) -> Result<Vec<String>> {
        let mut identifiers = Vec::new();

        loop {
            identifiers.push(self.expect_identifier()?);

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(identifiers)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(Error::UnexpectedEof(format!("{}", token)))
        } else {
            Err(Error::UnexpectedToken {
                expected: format!("{}", token),
                found: format!("{}", self.current()),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            Token::Eof => Err(Error::UnexpectedEof("identifier".to_string())),
            _ => Err(Error::UnexpectedToken {
                expected: "identifier".to_string(),
                found: format!("{}", self.current()),
            }),
        }
    }

    fn expect_integer(&mut self) -> Result<i64> {
        match self.current().clone() {
            Token::IntegerLiteral(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(Error::UnexpectedToken {
                expected: "integer".to_string(),
                found: format!("{}", self.current()),
            }),
        }
    }
}
