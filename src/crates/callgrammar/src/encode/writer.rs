//! Token writer for grammar output

use crate::constants::{COLON, COMMA, ESCAPE};

/// Accumulates grammar text, tracking separators inside a field list
pub struct GrammarWriter {
    buf: String,
    needs_comma: Vec<bool>,
}

impl GrammarWriter {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            needs_comma: Vec::new(),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    /// Open a comma-separated group, e.g. `{` or `[`
    pub fn open(&mut self, c: char) {
        self.buf.push(c);
        self.needs_comma.push(false);
    }

    /// Close the innermost group
    pub fn close(&mut self, c: char) {
        self.needs_comma.pop();
        self.buf.push(c);
    }

    /// Emit a separator before the next item of the innermost group
    pub fn item(&mut self) {
        if let Some(needs) = self.needs_comma.last_mut() {
            if *needs {
                self.buf.push(COMMA);
            }
            *needs = true;
        }
    }

    /// Write `key:`
    pub fn key(&mut self, key: &str) {
        self.item();
        self.buf.push_str(key);
        self.buf.push(COLON);
    }

    /// Write `<escape>value<escape>`
    pub fn escaped(&mut self, value: &str) {
        self.buf.push_str(ESCAPE);
        self.buf.push_str(value);
        self.buf.push_str(ESCAPE);
    }

    /// Write `key:<escape>value<escape>`
    pub fn escaped_field(&mut self, key: &str, value: &str) {
        self.key(key);
        self.escaped(value);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for GrammarWriter {
    fn default() -> Self {
        Self::new()
    }
}
