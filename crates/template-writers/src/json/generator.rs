//! Streaming JSON token generator.
//!
//! Tokens go straight to the sink; the only state kept is the nesting stack
//! needed to place commas and colons.

use std::io::Write;

use feature_common::WriterResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    scope: Scope,
    has_entries: bool,
}

/// JSON generator writing compact output to any [`Write`] sink.
pub struct JsonGenerator<W: Write> {
    out: W,
    stack: Vec<Frame>,
    after_name: bool,
}

impl<W: Write> JsonGenerator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stack: Vec::new(),
            after_name: false,
        }
    }

    /// Current nesting depth (0 outside any object or array).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn in_array(&self) -> bool {
        matches!(self.stack.last(), Some(f) if f.scope == Scope::Array)
    }

    fn before_value(&mut self) -> WriterResult<()> {
        if self.after_name {
            self.after_name = false;
            return Ok(());
        }
        if let Some(frame) = self.stack.last_mut() {
            if frame.has_entries {
                self.out.write_all(b",")?;
            }
            frame.has_entries = true;
        }
        Ok(())
    }

    pub fn write_start_object(&mut self) -> WriterResult<()> {
        self.before_value()?;
        self.out.write_all(b"{")?;
        self.stack.push(Frame {
            scope: Scope::Object,
            has_entries: false,
        });
        Ok(())
    }

    pub fn write_end_object(&mut self) -> WriterResult<()> {
        debug_assert!(matches!(self.stack.last(), Some(f) if f.scope == Scope::Object));
        self.stack.pop();
        self.out.write_all(b"}")?;
        Ok(())
    }

    pub fn write_start_array(&mut self) -> WriterResult<()> {
        self.before_value()?;
        self.out.write_all(b"[")?;
        self.stack.push(Frame {
            scope: Scope::Array,
            has_entries: false,
        });
        Ok(())
    }

    pub fn write_end_array(&mut self) -> WriterResult<()> {
        debug_assert!(self.in_array());
        self.stack.pop();
        self.out.write_all(b"]")?;
        Ok(())
    }

    pub fn write_field_name(&mut self, name: &str) -> WriterResult<()> {
        if let Some(frame) = self.stack.last_mut() {
            if frame.has_entries {
                self.out.write_all(b",")?;
            }
            frame.has_entries = true;
        }
        serde_json::to_writer(&mut self.out, name)?;
        self.out.write_all(b":")?;
        self.after_name = true;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> WriterResult<()> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, value)?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> WriterResult<()> {
        self.before_value()?;
        write!(self.out, "{}", value)?;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> WriterResult<()> {
        self.before_value()?;
        write!(self.out, "{}", value)?;
        Ok(())
    }

    /// Single precision value; non-finite values become `null`.
    pub fn write_f32(&mut self, value: f32) -> WriterResult<()> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, &value)?;
        Ok(())
    }

    /// Double precision value; non-finite values become `null`.
    pub fn write_f64(&mut self, value: f64) -> WriterResult<()> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, &value)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> WriterResult<()> {
        self.before_value()?;
        self.out.write_all(if value { b"true" } else { b"false" })?;
        Ok(())
    }

    pub fn write_null(&mut self) -> WriterResult<()> {
        self.before_value()?;
        self.out.write_all(b"null")?;
        Ok(())
    }

    pub fn write_string_field(&mut self, name: &str, value: &str) -> WriterResult<()> {
        self.write_field_name(name)?;
        self.write_string(value)
    }

    pub fn write_number_field(&mut self, name: &str, value: u64) -> WriterResult<()> {
        self.write_field_name(name)?;
        self.write_u64(value)
    }

    pub fn write_null_field(&mut self, name: &str) -> WriterResult<()> {
        self.write_field_name(name)?;
        self.write_null()
    }

    pub fn flush(&mut self) -> WriterResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
