//! The output writer contract shared by every encoding.

use feature_common::{AxisOrder, BoundingBox, Crs, EncodingHints, Link, Value, WriterResult};

/// Per-response state every writer carries.
///
/// The counter and the CRS are only changed through the named methods so the
/// axis order can never disagree with the CRS.
#[derive(Debug, Clone, Default)]
pub struct OutputState {
    number_returned: u64,
    crs: Option<Crs>,
    axis_order: AxisOrder,
}

impl OutputState {
    pub fn increment_number_returned(&mut self) {
        self.number_returned += 1;
    }

    pub fn number_returned(&self) -> u64 {
        self.number_returned
    }

    /// Set the CRS; the axis order follows it (east/north when unset).
    pub fn set_crs(&mut self, crs: Option<Crs>) {
        self.axis_order = crs.as_ref().map(Crs::axis_order).unwrap_or_default();
        self.crs = crs;
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }
}

/// Literal content embedded in a template.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticContent {
    /// A parsed JSON subtree, re-emitted as is by the JSON writers.
    Json(serde_json::Value),
    /// Raw characters, written as text by the XML writers.
    Text(String),
}

/// Streams one response in a target encoding while the template tree and
/// the features are walked.
///
/// Structural calls must be balanced by the caller: every `start_*` gets its
/// matching `end_*`, in LIFO order.
pub trait TemplateOutputWriter {
    fn state(&self) -> &OutputState;

    fn state_mut(&mut self) -> &mut OutputState;

    /// Open the document.
    fn start_template_output(&mut self, hints: &EncodingHints) -> WriterResult<()>;

    /// Close the document.
    fn end_template_output(&mut self, hints: &EncodingHints) -> WriterResult<()>;

    fn start_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()>;

    fn end_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()>;

    fn start_array(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()>;

    fn end_array(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()>;

    fn write_element_name(&mut self, name: Option<&str>, hints: &EncodingHints)
        -> WriterResult<()>;

    fn write_element_value(&mut self, value: &Value, hints: &EncodingHints) -> WriterResult<()>;

    /// Write a named value, dispatching on its kind.
    fn write_element_name_and_value(
        &mut self,
        name: Option<&str>,
        value: &Value,
        hints: &EncodingHints,
    ) -> WriterResult<()>;

    /// Write template content verbatim, bypassing the value dispatch.
    fn write_static_content(
        &mut self,
        name: Option<&str>,
        content: &StaticContent,
        hints: &EncodingHints,
    ) -> WriterResult<()>;

    /// Total number of matching features, `None` when unknown.
    fn write_collection_counts(&mut self, feature_count: Option<u64>) -> WriterResult<()>;

    fn write_crs(&mut self) -> WriterResult<()>;

    fn write_time_stamp(&mut self) -> WriterResult<()>;

    fn write_collection_bounds(&mut self, bounds: &BoundingBox) -> WriterResult<()>;

    fn write_number_returned(&mut self) -> WriterResult<()>;

    /// Paging links; only link-aware encodings write anything.
    fn write_paging_links(
        &mut self,
        _mime_type: &str,
        _previous: Option<&str>,
        _next: Option<&str>,
    ) -> WriterResult<()> {
        tracing::debug!("paging links not supported by this encoding");
        Ok(())
    }

    fn write_links(&mut self, _links: &[Link]) -> WriterResult<()> {
        tracing::debug!("links not supported by this encoding");
        Ok(())
    }

    /// Flush and release the sink. Later calls are no-ops.
    fn close(&mut self) -> WriterResult<()>;

    fn increment_number_returned(&mut self) {
        self.state_mut().increment_number_returned();
    }

    fn number_returned(&self) -> u64 {
        self.state().number_returned()
    }

    fn set_crs(&mut self, crs: Option<Crs>) {
        self.state_mut().set_crs(crs);
    }

    fn crs(&self) -> Option<&Crs> {
        self.state().crs()
    }

    fn axis_order(&self) -> AxisOrder {
        self.state().axis_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order_follows_crs() {
        let mut state = OutputState::default();
        assert_eq!(state.axis_order(), AxisOrder::EastNorth);

        state.set_crs(Some(Crs::epsg(4326)));
        assert_eq!(state.axis_order(), AxisOrder::NorthEast);

        state.set_crs(None);
        assert_eq!(state.axis_order(), AxisOrder::EastNorth);
        assert!(state.crs().is_none());
    }

    #[test]
    fn test_number_returned() {
        let mut state = OutputState::default();
        state.increment_number_returned();
        state.increment_number_returned();
        assert_eq!(state.number_returned(), 2);
    }
}
