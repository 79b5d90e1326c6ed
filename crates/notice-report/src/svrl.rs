//! Reader for the parts of an SVRL document the extractor uses.
//!
//! Elements are matched by local name, so any prefix bound to the SVRL
//! namespace works. Everything except `fired-rule`, `failed-assert` and the
//! assert's `text` and `diagnostic-reference` children is skipped.

use notice_model::{DiagnosticReference, FailedAssert, FiredRule, ValidationReport};
use notice_xml::{RawText, XmlError, unescape_raw};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{ReportError, Result};

/// Local name of the SVRL document element.
pub const SVRL_ROOT: &str = "schematron-output";

/// Parses an SVRL report. Fired rules and failed asserts keep document order.
pub fn parse_svrl(text: &str) -> Result<ValidationReport> {
    let mut reader = Reader::from_str(text);
    let mut builder = ReportBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| ReportError::Malformed {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;
        builder.position = reader.buffer_position() as u64;
        match event {
            Event::Start(start) => {
                builder.ensure_inside_root("element")?;
                builder.open(&start, false)?;
                builder.depth += 1;
            }
            Event::Empty(start) => {
                builder.ensure_inside_root("element")?;
                builder.open(&start, true)?;
                builder.root_closed = builder.depth == 0;
            }
            Event::End(end) => {
                builder.depth = builder.depth.saturating_sub(1);
                let name = local_str(end.local_name().as_ref())?;
                builder.close(&name)?;
                builder.root_closed = builder.depth == 0;
            }
            Event::Text(chunk) => {
                if !chunk.iter().all(u8::is_ascii_whitespace) {
                    builder.ensure_inside_root("text")?;
                }
                if let Some(message) = builder.message.as_mut() {
                    message.push_text(&chunk)?;
                }
            }
            Event::GeneralRef(reference) => {
                builder.ensure_inside_root("text")?;
                if let Some(message) = builder.message.as_mut() {
                    message.push_ref(&reference)?;
                }
            }
            Event::CData(cdata) => {
                builder.ensure_inside_root("text")?;
                if let Some(message) = builder.message.as_mut() {
                    message.push_cdata(&cdata)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !builder.seen_root {
        return Err(ReportError::Empty);
    }
    if builder.depth > 0 {
        return Err(ReportError::Malformed {
            position: builder.position,
            message: "report ends inside an open element".to_string(),
        });
    }
    debug!(
        fired = builder.report.fired_rules.len(),
        failed = builder.report.failed_asserts.len(),
        "read SVRL report"
    );
    Ok(builder.report)
}

#[derive(Default)]
struct ReportBuilder {
    report: ValidationReport,
    seen_root: bool,
    /// Set once the document element has been closed; only comments,
    /// processing instructions and whitespace may follow.
    root_closed: bool,
    depth: usize,
    position: u64,
    /// Failed assert whose children are being read.
    assert: Option<FailedAssert>,
    /// Open `diagnostic-reference` of the current assert; its own `text`
    /// child is not the assert message.
    in_diagnostic: bool,
    /// Message text of the current assert while inside its `text` child.
    message: Option<RawText>,
}

impl ReportBuilder {
    fn ensure_inside_root(&self, what: &str) -> Result<()> {
        if self.root_closed {
            return Err(ReportError::Malformed {
                position: self.position,
                message: format!("{what} after the <{SVRL_ROOT}> element"),
            });
        }
        Ok(())
    }

    fn open(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<()> {
        let name = local_str(start.local_name().as_ref())?;
        if !self.seen_root {
            if name != SVRL_ROOT {
                return Err(ReportError::UnexpectedRoot {
                    found: name,
                    expected: SVRL_ROOT.to_string(),
                });
            }
            self.seen_root = true;
            return Ok(());
        }

        match name.as_str() {
            "fired-rule" => {
                let context = self.required(start, &name, "context")?;
                self.report.fired_rules.push(FiredRule { context });
            }
            "failed-assert" => {
                let failed = FailedAssert {
                    id: self.optional(start, "id")?,
                    location: self.required(start, &name, "location")?,
                    test: self.optional(start, "test")?,
                    role: self.optional(start, "role")?,
                    text: String::new(),
                    diagnostic_reference: None,
                };
                if empty {
                    self.report.failed_asserts.push(failed);
                } else {
                    self.assert = Some(failed);
                }
            }
            "diagnostic-reference" if self.assert.is_some() => {
                let see = self.optional(start, "see")?;
                if let Some(failed) = self.assert.as_mut() {
                    failed.diagnostic_reference = Some(DiagnosticReference { see });
                }
                self.in_diagnostic = !empty;
            }
            "text" if self.assert.is_some() && !self.in_diagnostic && !empty => {
                self.message = Some(RawText::new());
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        match name {
            "text" => {
                if let Some(message) = self.message.take() {
                    let text = message.unescaped("svrl:text")?;
                    // A second message element of the same assert is ignored.
                    if let Some(failed) = self.assert.as_mut().filter(|f| f.text.is_empty()) {
                        failed.text = text.trim().to_string();
                    }
                }
            }
            "diagnostic-reference" => self.in_diagnostic = false,
            "failed-assert" => {
                if let Some(failed) = self.assert.take() {
                    self.report.failed_asserts.push(failed);
                }
                self.in_diagnostic = false;
            }
            _ => {}
        }
        Ok(())
    }

    fn optional(&self, start: &BytesStart<'_>, attribute: &str) -> Result<Option<String>> {
        let Some(attr) = start
            .try_get_attribute(attribute)
            .map_err(|e| ReportError::Malformed {
                position: self.position,
                message: e.to_string(),
            })?
        else {
            return Ok(None);
        };
        let raw = std::str::from_utf8(&attr.value).map_err(|_| XmlError::Utf8 {
            context: format!("attribute {attribute}"),
        })?;
        Ok(Some(unescape_raw(raw, attribute)?.into_owned()))
    }

    fn required(&self, start: &BytesStart<'_>, element: &str, attribute: &str) -> Result<String> {
        self.optional(start, attribute)?
            .ok_or_else(|| ReportError::MissingAttribute {
                element: element.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

fn local_str(name: &[u8]) -> Result<String> {
    let name = std::str::from_utf8(name).map_err(|_| XmlError::Utf8 {
        context: "element name".to_string(),
    })?;
    Ok(name.to_string())
}
