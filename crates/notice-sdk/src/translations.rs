//! Label tables from Java-properties XML translation files:
//!
//! ```xml
//! <properties>
//!   <entry key="field|name|BT-01-notice">Legal Basis</entry>
//! </properties>
//! ```

use std::path::Path;

use notice_model::LabelTable;
use notice_xml::{RawText, unescape_raw};
use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::events::attributes::Attribute;
use tracing::{debug, warn};

use crate::error::{Result, SdkError};
use crate::paths;

pub const FALLBACK_LANGUAGE: &str = "en";

/// Translation assets merged into one label table.
pub const LABEL_ASSETS: [&str; 2] = ["field", "group"];

/// Loads field and group labels of one language.
///
/// When a non-English file is missing, the English file supplies the keys
/// with empty texts so that lookups still know the identifiers.
pub fn load_label_table(version_dir: &Path, lang: &str) -> Result<LabelTable> {
    let lang = lang.to_ascii_lowercase();
    let mut table = LabelTable::new();
    for asset in LABEL_ASSETS {
        let path = paths::translation_file(version_dir, asset, &lang);
        if path.is_file() {
            let text = std::fs::read_to_string(&path).map_err(|e| SdkError::io(&path, e))?;
            let count = parse_translations(&text, &path, &mut table, false)?;
            debug!(asset, lang = %lang, count, "loaded translations");
            continue;
        }
        if lang == FALLBACK_LANGUAGE {
            return Err(SdkError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "translation file not found"),
            ));
        }
        let fallback = paths::translation_file(version_dir, asset, FALLBACK_LANGUAGE);
        warn!(
            asset,
            lang = %lang,
            "translation file missing, using {FALLBACK_LANGUAGE} keys without text"
        );
        let text =
            std::fs::read_to_string(&fallback).map_err(|e| SdkError::io(&fallback, e))?;
        parse_translations(&text, &fallback, &mut table, true)?;
    }
    Ok(table)
}

/// Adds every `<entry key="...">` of a properties document to `table` and
/// returns how many label keys were recognised. With `keys_only` the texts
/// are replaced by empty strings.
pub fn parse_translations(
    text: &str,
    origin: &Path,
    table: &mut LabelTable,
    keys_only: bool,
) -> Result<usize> {
    let fail = |message: String| SdkError::Translations {
        path: origin.to_path_buf(),
        message,
    };
    let mut reader = Reader::from_str(text);
    let mut current_key: Option<String> = None;
    let mut value = RawText::new();
    let mut count = 0;

    loop {
        match reader.read_event().map_err(|e| fail(e.to_string()))? {
            Event::Start(start) if start.local_name().as_ref() == b"entry" => {
                let key = start
                    .try_get_attribute("key")
                    .map_err(|e| fail(e.to_string()))?
                    .ok_or_else(|| fail("entry without key attribute".to_string()))?;
                current_key = Some(attribute_text(&key).map_err(fail)?);
                value.clear();
            }
            Event::Empty(start) if start.local_name().as_ref() == b"entry" => {
                if let Some(key) = start
                    .try_get_attribute("key")
                    .map_err(|e| fail(e.to_string()))?
                {
                    let key = attribute_text(&key).map_err(fail)?;
                    if table.insert_translation_key(&key, String::new()) {
                        count += 1;
                    }
                }
            }
            Event::Text(text) if current_key.is_some() => {
                value.push_text(&text).map_err(|e| fail(e.to_string()))?;
            }
            Event::GeneralRef(reference) if current_key.is_some() => {
                value.push_ref(&reference).map_err(|e| fail(e.to_string()))?;
            }
            Event::CData(cdata) if current_key.is_some() => {
                value.push_cdata(&cdata).map_err(|e| fail(e.to_string()))?;
            }
            Event::End(end) if end.local_name().as_ref() == b"entry" => {
                if let Some(key) = current_key.take() {
                    let label = if keys_only {
                        String::new()
                    } else {
                        value.unescaped(&key).map_err(|e| fail(e.to_string()))?
                    };
                    if table.insert_translation_key(&key, label) {
                        count += 1;
                    }
                }
                value.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(count)
}

fn attribute_text(attr: &Attribute<'_>) -> std::result::Result<String, String> {
    let raw = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
    unescape_raw(raw, "entry key")
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| e.to_string())
}
