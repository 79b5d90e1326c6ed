//! Accumulates character data in its escaped source form.
//!
//! The reader reports entity references (`&amp;`, `&#233;`) separately from
//! the surrounding text, so text content is rebuilt raw first and unescaped
//! once at the end.

use std::borrow::Cow;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesCData, BytesRef, BytesText};

use crate::error::XmlError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText {
    raw: String,
}

impl RawText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, text: &BytesText<'_>) -> Result<(), XmlError> {
        self.raw.push_str(utf8(text, "text")?);
        Ok(())
    }

    pub fn push_ref(&mut self, reference: &BytesRef<'_>) -> Result<(), XmlError> {
        self.raw.push('&');
        self.raw.push_str(utf8(reference, "entity reference")?);
        self.raw.push(';');
        Ok(())
    }

    /// CDATA content is literal, so it is escaped before joining raw text.
    pub fn push_cdata(&mut self, cdata: &BytesCData<'_>) -> Result<(), XmlError> {
        let content = utf8(cdata, "CDATA section")?;
        self.raw.push_str(&escape(content));
        Ok(())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn into_raw(self) -> String {
        self.raw
    }

    pub fn unescaped(&self, context: &str) -> Result<String, XmlError> {
        unescape_raw(&self.raw, context).map(Cow::into_owned)
    }
}

pub fn unescape_raw<'a>(raw: &'a str, context: &str) -> Result<Cow<'a, str>, XmlError> {
    unescape(raw).map_err(|e| XmlError::Escape {
        context: context.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn utf8<'a>(bytes: &'a [u8], context: &str) -> Result<&'a str, XmlError> {
    std::str::from_utf8(bytes).map_err(|_| XmlError::Utf8 {
        context: context.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_and_references() {
        let mut text = RawText::new();
        text.push_text(&BytesText::from_escaped("Tom ")).unwrap();
        text.push_ref(&BytesRef::new("amp")).unwrap();
        text.push_text(&BytesText::from_escaped(" Jerry")).unwrap();
        text.push_cdata(&BytesCData::new("<x>")).unwrap();
        assert_eq!(text.raw(), "Tom &amp; Jerry&lt;x&gt;");
        assert_eq!(text.unescaped("test").unwrap(), "Tom & Jerry<x>");
    }
}
