//! Presentation forms of a design document.
//!
//! Every converter is a pure function of its input plus the key mapping.
//! [`convert`] dispatches over `(from, to)` pairs and composes the single
//! step converters for the longer paths.

mod human;
mod markdown;
mod pdf;

pub use human::{human_to_structured, relabel_content, structured_to_human, unlabel_content};
pub use markdown::{human_to_markdown, markdown_to_human};
pub use pdf::markdown_to_pdf;

use crate::core::ConversionError;
use crate::keymap::KeyMapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Short-keyed JSON as produced by assembly.
    Json,
    /// JSON with module content keys replaced by labels.
    Human,
    Markdown,
    Pdf,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json | Format::Human => "json",
            Format::Markdown => "md",
            Format::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Json => "json",
            Format::Human => "human",
            Format::Markdown => "markdown",
            Format::Pdf => "pdf",
        };
        write!(f, "{name}")
    }
}

/// What the caller is entitled to. PDF output needs `Extended`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    #[default]
    Standard,
    Extended,
}

#[derive(Clone, Debug)]
pub struct ConversionRequest {
    pub from: Format,
    pub to: Format,
    pub input: Vec<u8>,
}

impl ConversionRequest {
    pub fn new(from: Format, to: Format, input: impl Into<Vec<u8>>) -> Self {
        Self {
            from,
            to,
            input: input.into(),
        }
    }
}

/// Output of one conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum Converted {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl Converted {
    pub fn into_bytes(self) -> Result<Vec<u8>, ConversionError> {
        Ok(match self {
            Converted::Json(value) => {
                let mut bytes = serde_json::to_vec_pretty(&value)?;
                bytes.push(b'\n');
                bytes
            }
            Converted::Text(text) => text.into_bytes(),
            Converted::Binary(bytes) => bytes,
        })
    }
}

pub fn convert(
    request: &ConversionRequest,
    mapping: &KeyMapping,
    capability: Capability,
) -> Result<Converted, ConversionError> {
    use Format::*;

    if request.to == Pdf && capability != Capability::Extended {
        return Err(ConversionError::NotEntitled(request.to.to_string()));
    }

    let unsupported = || ConversionError::Unsupported {
        from: request.from.to_string(),
        to: request.to.to_string(),
    };

    log::debug!(
        "Converting {} bytes from {} to {}",
        request.input.len(),
        request.from,
        request.to
    );

    match (request.from, request.to) {
        (Json, Human) => Ok(Converted::Json(structured_to_human(&json_input(request)?, mapping)?)),
        (Human, Json) => Ok(Converted::Json(human_to_structured(&json_input(request)?, mapping)?)),
        (Json | Human, Markdown) => Ok(Converted::Text(to_markdown(request, mapping)?)),
        (Markdown, Human) => Ok(Converted::Json(markdown_to_human(&text_input(request)?)?)),
        (Markdown, Json) => {
            let human = markdown_to_human(&text_input(request)?)?;
            Ok(Converted::Json(human_to_structured(&human, mapping)?))
        }
        (Json | Human, Pdf) => Ok(Converted::Binary(markdown_to_pdf(&to_markdown(request, mapping)?)?)),
        (Markdown, Pdf) => Ok(Converted::Binary(markdown_to_pdf(&text_input(request)?)?)),
        _ => Err(unsupported()),
    }
}

fn to_markdown(request: &ConversionRequest, mapping: &KeyMapping) -> Result<String, ConversionError> {
    let document = json_input(request)?;
    let human = match request.from {
        Format::Json => structured_to_human(&document, mapping)?,
        _ => document,
    };
    human_to_markdown(&human, mapping)
}

fn json_input(request: &ConversionRequest) -> Result<Value, ConversionError> {
    Ok(serde_json::from_slice(&request.input)?)
}

fn text_input(request: &ConversionRequest) -> Result<String, ConversionError> {
    String::from_utf8(request.input.clone())
        .map_err(|e| ConversionError::Render(format!("input is not UTF-8: {e}")))
}
