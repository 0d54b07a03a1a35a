use core::fmt::{Formatter, Write};

/// Writer that indents every line written through it
pub struct Indenter<'a, 'b> {
    inner: &'a mut Formatter<'b>,
    spaces: usize,
    needs_indent: bool,
}

impl<'a, 'b> Indenter<'a, 'b> {
    pub fn new(f: &'a mut Formatter<'b>) -> Self {
        Self::with_spaced(f, 4)
    }

    pub fn with_spaced(f: &'a mut Formatter<'b>, spaces: usize) -> Self {
        Self {
            inner: f,
            spaces,
            needs_indent: true,
        }
    }
}

impl Write for Indenter<'_, '_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for (idx, line) in s.split('\n').enumerate() {
            if idx > 0 {
                self.inner.write_char('\n')?;

                // Update so we draw another indent at the start of the line
                self.needs_indent = true;
            }
            if line.is_empty() {
                continue;
            }

            if self.needs_indent {
                let spaces = self.spaces;
                write!(self.inner, "{: >spaces$}", "")?;
                // Make sure not to indent elements being formatted into the string
                self.needs_indent = false;
            }

            self.inner.write_str(line)?;
        }
        Ok(())
    }
}
