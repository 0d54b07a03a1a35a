use core::fmt;

mod str_parser;
pub use str_parser::*;

/// Parser error
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParserError {
    pub line   : usize,
    pub column : usize,
    pub msg    : &'static str,
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.msg)
    }
}

impl std::error::Error for ParserError {}
