//! SQL Lexer (Tokenizer)
//!
//! This module converts schema scripts into a stream of tokens.

use super::token::Token;
use crate::error::{Error, Result};

/// SQL Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        if self.is_at_end() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '=' => Some(Token::Eq),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '\'' => self.read_quoted('\'').map(Token::StringLiteral),
            '`' | '"' => self.read_quoted(ch).map(Token::Identifier),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c => Err(Error::UnexpectedCharacter(c, self.position)),
        }
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Peek at the next character
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skip whitespace and comments (`--`, `#` and `/* */`)
    fn skip_trivia(&mut self) {
        loop {
            while !self.is_at_end() && self.current_char().is_whitespace() {
                self.advance();
            }
            if self.is_at_end() {
                return;
            }

            let ch = self.current_char();
            if (ch == '-' && self.peek_char() == Some('-')) || ch == '#' {
                while !self.is_at_end() && self.current_char() != '\n' {
                    self.advance();
                }
            } else if ch == '/' && self.peek_char() == Some('*') {
                self.advance();
                self.advance();
                while !self.is_at_end() {
                    if self.current_char() == '*' && self.peek_char() == Some('/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
            } else {
                return;
            }
        }
    }

    /// Read text enclosed in `quote`; a doubled quote stands for itself
    fn read_quoted(&mut self, quote: char) -> Result<String> {
        let start_pos = self.position;
        self.advance(); // skip opening quote

        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch == quote {
                if self.peek_char() == Some(quote) {
                    value.push(quote);
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // skip closing quote
                    return Ok(value);
                }
            } else {
                value.push(ch);
                self.advance();
            }
        }

        Err(Error::UnterminatedString(start_pos))
    }

    /// Read an integer literal
    fn read_number(&mut self) -> Result<Token> {
        let start_pos = self.position;
        let mut value = String::new();

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            value.push(self.current_char());
            self.advance();
        }

        value
            .parse::<i64>()
            .map(Token::IntegerLiteral)
            .map_err(|_| Error::InvalidNumber(start_pos))
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::from_keyword(&value).unwrap_or(Token::Identifier(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table() {
        let mut lexer =
            Lexer::new("CREATE TABLE books (id INT AUTO_INCREMENT PRIMARY KEY, title VARCHAR(255));");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Create,
                Token::Table,
                Token::Identifier("books".to_string()),
                Token::LParen,
                Token::Identifier("id".to_string()),
                Token::Int,
                Token::AutoIncrement,
                Token::Primary,
                Token::Key,
                Token::Comma,
                Token::Identifier("title".to_string()),
                Token::Varchar,
                Token::LParen,
                Token::IntegerLiteral(255),
                Token::RParen,
                Token::RParen,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let mut lexer = Lexer::new("USE `library db`; USE \"x\"\"y\"");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[1], Token::Identifier("library db".to_string()));
        assert_eq!(tokens[4], Token::Identifier("x\"y".to_string()));
    }

    #[test]
    fn test_string_literal() {
        let mut lexer = Lexer::new("'it''s'");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0], Token::StringLiteral("it's".to_string()));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new(
            "-- library schema\n# mysql style\nCREATE /* inline */ DATABASE library",
        );
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Create,
                Token::Database,
                Token::Identifier("library".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Lexer::new("USE lib@").tokenize(),
            Err(Error::UnexpectedCharacter('@', 7))
        ));
        assert!(matches!(
            Lexer::new("USE `lib").tokenize(),
            Err(Error::UnterminatedString(4))
        ));
        assert!(matches!(
            Lexer::new("VARCHAR(99999999999999999999)").tokenize(),
            Err(Error::InvalidNumber(8))
        ));
    }
}
