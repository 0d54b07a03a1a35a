use crate::ParserError;

/// Parser that can parse a `&str`
///
/// Lines and columns are 1-based, so errors can be reported as-is.
#[derive(Clone, Copy, Debug)]
pub struct StrParser<'a> {
    pub line   : usize,
    pub column : usize,
    pub string : &'a str
}

impl<'a> StrParser<'a> {
    /// Create a new parser
    pub fn new(string: &'a str) -> Self {
        Self { line: 1, column: 1, string }
    }

    /// Create a new parser for a fragment that starts at the given line
    pub fn at_line(string: &'a str, line: usize) -> Self {
        Self { line, column: 1, string }
    }

    /// Try to consume a given character
    pub fn consume_char(&mut self, ch: char) -> bool {
        if self.string.starts_with(ch) {
            self.consume_count(ch.len_utf8());
            true
        } else {
            false
        }
    }

    /// Consume `count` bytes
    pub fn consume_count(&mut self, count: usize) {
        let count = count.min(self.string.len());
        let s = &self.string[..count];
        match s.rfind('\n') {
            Some(idx) => {
                self.line += s.matches('\n').count();
                self.column = s[idx + 1..].chars().count() + 1;
            },
            None => self.column += s.chars().count(),
        }
        self.string = &self.string[count..];
    }

    pub fn consume_whitespace(&mut self, include_newline: bool) {
        let idx = self.string.find(|ch: char| !ch.is_whitespace() || (!include_newline && ch == '\n')).unwrap_or(self.string.len());
        self.consume_count(idx);
    }

    /// Check if there is still data to parse
    pub fn can_parse(&self) -> bool {
        !self.string.is_empty()
    }

    /// Create an error at the current line and column
    pub fn error(&self, msg: &'static str) -> ParserError {
        ParserError { line: self.line, column: self.column, msg }
    }

    /// Extract until a character matching `pred` is reached, the matching character is not consumed
    pub fn extract_until<P: FnMut(char) -> bool>(&mut self, pred: P) -> &'a str {
        let string = self.string;
        let idx = string.find(pred).unwrap_or(string.len());
        let res = &string[..idx];
        self.consume_count(idx);
        res
    }

    /// Extract the longest prefix where every character matches `pred`
    pub fn extract_while<P: FnMut(char) -> bool>(&mut self, mut pred: P) -> &'a str {
        self.extract_until(|ch| !pred(ch))
    }

    /// Extract exactly `count` characters that all match `pred`, nothing is consumed on failure
    pub fn extract_exact<P: FnMut(char) -> bool>(&mut self, count: usize, mut pred: P) -> Option<&'a str> {
        let string = self.string;
        let mut end = 0;
        let mut chars = string.char_indices();
        for _ in 0..count {
            match chars.next() {
                Some((idx, ch)) if pred(ch) => end = idx + ch.len_utf8(),
                _ => return None,
            }
        }
        let res = &string[..end];
        self.consume_count(end);
        Some(res)
    }
}
