//! Schema-script language
//!
//! Lexer, parser and AST for the data-definition statements a schema script
//! is made of.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Statement;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::Token;
