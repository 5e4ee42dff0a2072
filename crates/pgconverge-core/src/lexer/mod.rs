//! DDL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for PostgreSQL DDL that produces
//! a stream of tokens, each tagged with the line it starts on.

mod token;
mod tokenizer;

pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
