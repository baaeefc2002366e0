//! SQL Token definitions
//!
//! This module defines all tokens that can appear in a schema script.

use std::fmt;

/// SQL Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // ========== Keywords ==========
    // DDL Keywords
    Create,
    Drop,
    Use,
    Table,
    Database,
    Schema,
    If,
    Not,
    Exists,
    Engine,

    // Constraints
    Primary,
    Key,
    AutoIncrement,
    Null,

    // Recognized so they can be rejected with a clear message
    Foreign,
    References,
    Unique,
    Check,
    Default,
    Constraint,
    Index,

    // Data Types
    Int,
    Integer,
    BigInt,
    Varchar,
    Char,
    Text,

    // ========== Literals ==========
    /// Integer literal
    IntegerLiteral(i64),
    /// String literal (single-quoted)
    StringLiteral(String),
    /// Identifier (database, table or column name)
    Identifier(String),

    // ========== Operators & Delimiters ==========
    /// =
    Eq,
    /// (
    LParen,
    /// )
    RParen,
    /// ,
    Comma,
    /// ;
    Semicolon,

    // ========== Special ==========
    /// End of input
    Eof,
}

impl Token {
    /// Try to parse a keyword from a string
    pub fn from_keyword(s: &str) -> Option<Token> {
        match s.to_uppercase().as_str() {
            // DDL
            "CREATE" => Some(Token::Create),
            "DROP" => Some(Token::Drop),
            "USE" => Some(Token::Use),
            "TABLE" => Some(Token::Table),
            "DATABASE" => Some(Token::Database),
            "SCHEMA" => Some(Token::Schema),
            "IF" => Some(Token::If),
            "NOT" => Some(Token::Not),
            "EXISTS" => Some(Token::Exists),
            "ENGINE" => Some(Token::Engine),

            // Constraints
            "PRIMARY" => Some(Token::Primary),
            "KEY" => Some(Token::Key),
            "AUTO_INCREMENT" => Some(Token::AutoIncrement),
            "NULL" => Some(Token::Null),
            "FOREIGN" => Some(Token::Foreign),
            "REFERENCES" => Some(Token::References),
            "UNIQUE" => Some(Token::Unique),
            "CHECK" => Some(Token::Check),
            "DEFAULT" => Some(Token::Default),
            "CONSTRAINT" => Some(Token::Constraint),
            "INDEX" => Some(Token::Index),

            // Data Types
            "INT" => Some(Token::Int),
            "INTEGER" => Some(Token::Integer),
            "BIGINT" => Some(Token::BigInt),
            "VARCHAR" => Some(Token::Varchar),
            "CHAR" => Some(Token::Char),
            "TEXT" => Some(Token::Text),

            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Create => write!(f, "CREATE"),
            Token::Drop => write!(f, "DROP"),
            Token::Use => write!(f, "USE"),
            Token::Table => write!(f, "TABLE"),
            Token::Database => write!(f, "DATABASE"),
            Token::Schema => write!(f, "SCHEMA"),
            Token::If => write!(f, "IF"),
            Token::Not => write!(f, "NOT"),
            Token::Exists => write!(f, "EXISTS"),
            Token::Engine => write!(f, "ENGINE"),
            Token::Primary => write!(f, "PRIMARY"),
            Token::Key => write!(f, "KEY"),
            Token::AutoIncrement => write!(f, "AUTO_INCREMENT"),
            Token::Null => write!(f, "NULL"),
            Token::Foreign => write!(f, "FOREIGN"),
            Token::References => write!(f, "REFERENCES"),
            Token::Unique => write!(f, "UNIQUE"),
            Token::Check => write!(f, "CHECK"),
            Token::Default => write!(f, "DEFAULT"),
            Token::Constraint => write!(f, "CONSTRAINT"),
            Token::Index => write!(f, "INDEX"),
            Token::Int => write!(f, "INT"),
            Token::Integer => write!(f, "INTEGER"),
            Token::BigInt => write!(f, "BIGINT"),
            Token::Varchar => write!(f, "VARCHAR"),
            Token::Char => write!(f, "CHAR"),
            Token::Text => write!(f, "TEXT"),
            Token::IntegerLiteral(n) => write!(f, "{}", n),
            Token::StringLiteral(s) => write!(f, "'{}'", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Eq => write!(f, "="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
