//! DOM text node backing the coordinate bridge.

use scene::bridge::CoordinateSink;
use web_sys::{Document, Element};

use crate::error::HostError;

/// Writes bridge text into one element, found or created by id.
///
/// The element is never replaced, so a reader holding a reference to it
/// keeps seeing updates.
pub struct DomTextSink {
    element: Element,
}

impl DomTextSink {
    /// Use the element with `id`, creating it under `<body>` if missing.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Dom` if the element cannot be created or attached.
    pub fn attach(document: &Document, id: &str) -> Result<Self, HostError> {
        if let Some(element) = document.get_element_by_id(id) {
            return Ok(Self { element });
        }
        let element = document.create_element("span").map_err(|e| HostError::dom(&e))?;
        element.set_id(id);
        element.set_attribute("aria-live", "off").map_err(|e| HostError::dom(&e))?;
        let body = document.body().ok_or(HostError::NoDocument)?;
        body.append_child(&element).map_err(|e| HostError::dom(&e))?;
        log::info!("created bridge element #{id}");
        Ok(Self { element })
    }
}

impl CoordinateSink for DomTextSink {
    fn write(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}
