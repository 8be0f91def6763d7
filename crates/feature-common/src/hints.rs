//! Encoding hints threaded through the writer calls.
//!
//! Hints are produced per template node by the template builder and are
//! read-only for the writers. The well-known hints are typed fields, the
//! open-ended ones (XHTML `link*` keys and format specific extras) live in an
//! ordered extension list.

use std::fmt;
use std::rc::Rc;

use crate::error::WriterResult;
use crate::value::Value;

/// Receives attributes computed for the element that was just opened.
pub trait AttributeSink {
    fn write_attribute(&mut self, name: &str, value: &Value) -> WriterResult<()>;
}

/// Deferred evaluation run after an XML element is opened and before its
/// children are written.
pub type ChildrenEvaluation = Rc<dyn Fn(&mut dyn AttributeSink) -> WriterResult<()>>;

/// A single XML attribute carried by a hint, e.g. one attribute of a `<link>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub local_name: String,
    pub value: String,
}

impl XmlAttribute {
    pub fn new(local_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            value: value.into(),
        }
    }
}

/// Value stored under an extension hint key.
#[derive(Debug, Clone, PartialEq)]
pub enum HintValue {
    Text(String),
    Attributes(Vec<XmlAttribute>),
    Json(serde_json::Value),
}

/// Per-node encoding hints.
#[derive(Clone, Default)]
pub struct EncodingHints {
    /// Inline the object's children without its own braces.
    pub skip_object_encoding: bool,
    /// JSON-LD `@context` payload.
    pub context: Option<serde_json::Value>,
    /// Overrides the default JSON-LD collection `type`.
    pub jsonld_type: Option<String>,
    /// Overrides the default `features` collection field name.
    pub collection_name: Option<String>,
    pub children_evaluation: Option<ChildrenEvaluation>,
    /// Write the value as an attribute of the open XML element.
    pub encode_as_attribute: bool,
    /// XHTML head `<script>` bodies.
    pub scripts: Vec<String>,
    /// XHTML head `<style>` bodies.
    pub styles: Vec<String>,
    extensions: Vec<(String, HintValue)>,
}

impl EncodingHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_object_encoding(mut self) -> Self {
        self.skip_object_encoding = true;
        self
    }

    pub fn encode_as_attribute(mut self) -> Self {
        self.encode_as_attribute = true;
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_jsonld_type(mut self, type_: impl Into<String>) -> Self {
        self.jsonld_type = Some(type_.into());
        self
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    pub fn with_children_evaluation<F>(mut self, evaluation: F) -> Self
    where
        F: Fn(&mut dyn AttributeSink) -> WriterResult<()> + 'static,
    {
        self.children_evaluation = Some(Rc::new(evaluation));
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.scripts.push(script.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.push(style.into());
        self
    }

    /// Add an open-ended hint. A key set twice keeps its first position.
    pub fn with_extension(mut self, key: impl Into<String>, value: HintValue) -> Self {
        let key = key.into();
        match self.extensions.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.extensions.push((key, value)),
        }
        self
    }

    pub fn extension(&self, key: &str) -> Option<&HintValue> {
        self.extensions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Extension hints whose key starts with `prefix`, in insertion order.
    pub fn extensions_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a HintValue)> + 'a {
        self.extensions
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for EncodingHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingHints")
            .field("skip_object_encoding", &self.skip_object_encoding)
            .field("context", &self.context)
            .field("jsonld_type", &self.jsonld_type)
            .field("collection_name", &self.collection_name)
            .field("children_evaluation", &self.children_evaluation.is_some())
            .field("encode_as_attribute", &self.encode_as_attribute)
            .field("scripts", &self.scripts)
            .field("styles", &self.styles)
            .field("extensions", &self.extensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_order_and_override() {
        let hints = EncodingHints::new()
            .with_extension("linkCss", HintValue::Text("a".to_string()))
            .with_extension("other", HintValue::Text("b".to_string()))
            .with_extension("linkIcon", HintValue::Text("c".to_string()))
            .with_extension("linkCss", HintValue::Text("d".to_string()));

        let keys: Vec<&str> = hints.extensions_with_prefix("link").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["linkCss", "linkIcon"]);
        assert_eq!(
            hints.extension("linkCss"),
            Some(&HintValue::Text("d".to_string()))
        );
        assert!(hints.extension("missing").is_none());
    }

    #[test]
    fn test_debug_hides_closure() {
        let hints = EncodingHints::new().with_children_evaluation(|_| Ok(()));
        let debug = format!("{:?}", hints);
        assert!(debug.contains("children_evaluation: true"));
    }
}
