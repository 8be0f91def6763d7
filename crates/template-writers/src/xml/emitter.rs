//! Streaming XML emitter on top of `quick_xml::Writer`.
//!
//! Start tags stay pending until the first child, text or end tag is written,
//! so attributes can still be added right after an element was opened.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

use feature_common::{AttributeSink, Value, WriterError, WriterResult};

pub struct XmlEmitter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl<W: Write> XmlEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: Writer::new(out),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn write_declaration(&mut self) -> WriterResult<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn start_element(&mut self, name: &str) -> WriterResult<()> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    /// Add an attribute to the element opened last.
    ///
    /// Fails once the start tag has been written, i.e. after any child,
    /// text or end tag.
    pub fn write_attribute(&mut self, name: &str, value: &str) -> WriterResult<()> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                Ok(())
            }
            None => Err(WriterError::Xml(format!(
                "attribute {} after element content",
                name
            ))),
        }
    }

    pub fn write_text(&mut self, text: &str) -> WriterResult<()> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    pub fn end_element(&mut self) -> WriterResult<()> {
        self.flush_pending()?;
        let name = self
            .open
            .pop()
            .ok_or_else(|| WriterError::Xml("end_element without open element".to_string()))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// `<name>text</name>`
    pub fn write_text_element(&mut self, name: &str, text: &str) -> WriterResult<()> {
        self.start_element(name)?;
        self.write_text(text)?;
        self.end_element()
    }

    pub fn flush(&mut self) -> WriterResult<()> {
        self.flush_pending()?;
        self.writer.get_mut().flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn flush_pending(&mut self) -> WriterResult<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}

impl<W: Write> AttributeSink for XmlEmitter<W> {
    fn write_attribute(&mut self, name: &str, value: &Value) -> WriterResult<()> {
        if value.is_null() {
            return Ok(());
        }
        match value.as_text() {
            Some(text) => XmlEmitter::write_attribute(self, name, &text),
            None => {
                warn!(attribute = name, "value cannot be written as attribute");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(emitter: XmlEmitter<Vec<u8>>) -> String {
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn test_nested_elements_with_attributes() {
        let mut emitter = XmlEmitter::new(Vec::new());
        emitter.start_element("a").unwrap();
        emitter.write_attribute("id", "1").unwrap();
        emitter.write_text_element("b", "x & y").unwrap();
        emitter.end_element().unwrap();
        assert_eq!(output(emitter), r#"<a id="1"><b>x &amp; y</b></a>"#);
    }

    #[test]
    fn test_attribute_after_content_is_error() {
        let mut emitter = XmlEmitter::new(Vec::new());
        emitter.start_element("a").unwrap();
        emitter.write_text("body").unwrap();
        let err = emitter.write_attribute("late", "2").unwrap_err();
        assert!(matches!(err, WriterError::Xml(ref msg) if msg.contains("late")));
        assert!(err.is_io());
        emitter.end_element().unwrap();
        assert_eq!(output(emitter), "<a>body</a>");
    }

    #[test]
    fn test_empty_element_is_open_and_close() {
        let mut emitter = XmlEmitter::new(Vec::new());
        emitter.start_element("empty").unwrap();
        emitter.end_element().unwrap();
        assert_eq!(output(emitter), "<empty></empty>");
    }

    #[test]
    fn test_unbalanced_end_is_error() {
        let mut emitter = XmlEmitter::new(Vec::new());
        let err = emitter.end_element().unwrap_err();
        assert!(matches!(err, WriterError::Xml(_)));
    }

    #[test]
    fn test_attribute_sink_skips_null() {
        let mut emitter = XmlEmitter::new(Vec::new());
        emitter.start_element("e").unwrap();
        {
            let sink: &mut dyn AttributeSink = &mut emitter;
            sink.write_attribute("n", &Value::Null).unwrap();
            sink.write_attribute("v", &Value::from(3)).unwrap();
        }
        emitter.end_element().unwrap();
        assert_eq!(output(emitter), r#"<e v="3"></e>"#);
    }

    #[test]
    fn test_declaration() {
        let mut emitter = XmlEmitter::new(Vec::new());
        emitter.write_declaration().unwrap();
        assert_eq!(output(emitter), r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    }
}
