//! HDL front end: lexer, token stream, AST, and parser.
//!
//! The entry point is [`parse_chip`], which lexes and parses one `.hdl` file
//! into a [`ast::ChipDecl`]. The front end is fail-fast: the first lexical or
//! grammar error aborts parsing and is returned as a [`ParseError`] value,
//! convertible to a rendered diagnostic.

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{ChipBody, ChipDecl, PartDecl, PinDecl, PinRef, SubSpec, Wire};
pub use error::{CursorError, ParseError};
pub use lexer::lex;
pub use parser::parse_chip;
pub use token::{HdlToken, Token, TokenCursor};
