use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ReconstructError;
use crate::model::{Vertex, Word};
use crate::warning::{ReconstructWarning, WarningCode};

/// Raw response from the OCR collaborator.
///
/// Three layouts are understood: the nested document annotation
/// (pages, blocks, paragraphs, words, symbols), the flat per-token annotation
/// list, and the `words`/`blocks` list written by the upload service when it
/// persists results to disk. Word entries stay as raw JSON so a single bad
/// word cannot fail the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, alias = "full_text_annotation")]
    pub full_text_annotation: Option<FullTextAnnotation>,
    #[serde(default, alias = "text_annotations")]
    pub text_annotations: Vec<Value>,
    #[serde(default)]
    pub words: Vec<Value>,
    #[serde(default)]
    pub blocks: Vec<Value>,
    #[serde(default, alias = "text_blocks")]
    pub text_blocks: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullTextAnnotation {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub words: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Debug, Deserialize)]
struct Symbol {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentWord {
    #[serde(default)]
    symbols: Vec<Symbol>,
    #[serde(alias = "bounding_box")]
    bounding_box: BoundingPoly,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextAnnotation {
    description: String,
    #[serde(alias = "bounding_poly")]
    bounding_poly: BoundingPoly,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct SavedWord {
    #[serde(alias = "description")]
    text: String,
    #[serde(alias = "bounding_box")]
    bounds: Vec<[i32; 2]>,
    #[serde(default)]
    confidence: Option<f32>,
}

impl OcrResponse {
    /// Parses a response body. A batch envelope (`{"responses": [...]}`)
    /// is unwrapped to its first entry.
    pub fn from_json(input: &str) -> Result<Self, ReconstructError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|error| ReconstructError::MalformedResponse(error.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self, ReconstructError> {
        if let Some(responses) = value.get_mut("responses").map(Value::take) {
            let Value::Array(entries) = responses else {
                return Err(ReconstructError::MalformedResponse(
                    "'responses' must be an array".to_string(),
                ));
            };
            value = entries.into_iter().next().unwrap_or_default();
        }
        if value.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(value)
            .map_err(|error| ReconstructError::MalformedResponse(error.to_string()))
    }

    /// Saved word list. Keys are tried in order `words`, `blocks`,
    /// `textBlocks`; the first non-empty one wins.
    #[must_use]
    pub fn saved_words(&self) -> &[Value] {
        [&self.words, &self.blocks, &self.text_blocks]
            .into_iter()
            .find(|list| !list.is_empty())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn service_error(&self) -> Option<ReconstructError> {
        let failed = |message: String, code: i64| ReconstructError::OcrService { code, message };

        match &self.error {
            Some(Value::String(message)) if !message.trim().is_empty() => {
                return Some(failed(message.clone(), 0));
            }
            Some(Value::Object(status)) => {
                let message = status
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let code = status.get("code").and_then(Value::as_i64).unwrap_or(0);
                if !message.trim().is_empty() {
                    return Some(failed(message.to_string(), code));
                }
                if code != 0 {
                    return Some(failed(format!("OCR service returned error code {code}"), code));
                }
            }
            _ => {}
        }

        if self.success == Some(false) {
            return Some(failed("OCR request reported failure".to_string(), 0));
        }
        None
    }
}

type WordParser = fn(&Value) -> Result<Word, String>;

fn corners_from_vertices(vertices: &[Vertex]) -> Option<[Vertex; 4]> {
    <[Vertex; 4]>::try_from(vertices).ok()
}

fn parse_entry<T: DeserializeOwned>(raw: &Value) -> Result<T, String> {
    T::deserialize(raw).map_err(|error| error.to_string())
}

fn document_word(raw: &Value) -> Result<Word, String> {
    let word: DocumentWord = parse_entry(raw)?;
    let text = word
        .symbols
        .iter()
        .map(|symbol| symbol.text.as_str())
        .collect::<String>();
    let corners = corners_from_vertices(&word.bounding_box.vertices)
        .ok_or_else(|| format!("expected 4 vertices, got {}", word.bounding_box.vertices.len()))?;
    finish_word(text, corners, word.confidence)
}

fn annotation_word(raw: &Value) -> Result<Word, String> {
    let annotation: TextAnnotation = parse_entry(raw)?;
    let corners = corners_from_vertices(&annotation.bounding_poly.vertices).ok_or_else(|| {
        format!(
            "expected 4 vertices, got {}",
            annotation.bounding_poly.vertices.len()
        )
    })?;
    finish_word(annotation.description, corners, annotation.confidence)
}

fn saved_word(raw: &Value) -> Result<Word, String> {
    let saved: SavedWord = parse_entry(raw)?;
    let vertices = saved
        .bounds
        .iter()
        .map(|[x, y]| Vertex::new(*x, *y))
        .collect::<Vec<_>>();
    let corners = corners_from_vertices(&vertices)
        .ok_or_else(|| format!("expected 4 corners, got {}", vertices.len()))?;
    finish_word(saved.text, corners, saved.confidence)
}

fn finish_word(text: String, corners: [Vertex; 4], confidence: Option<f32>) -> Result<Word, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("word has no text".to_string());
    }
    if confidence.is_some_and(|c| !c.is_finite()) {
        return Err("word confidence is not a finite number".to_string());
    }
    Ok(Word::new(text, corners, confidence))
}

/// Flattens an OCR response into words.
///
/// Fails only when the response as a whole reports an error. Individual
/// words that cannot be read are skipped with a warning. Words whose known
/// confidence falls below `min_confidence` are dropped; words without a
/// confidence are always kept.
pub fn extract_words(
    response: &OcrResponse,
    min_confidence: Option<f32>,
    warnings: &mut Vec<ReconstructWarning>,
) -> Result<Vec<Word>, ReconstructError> {
    if let Some(error) = response.service_error() {
        return Err(error);
    }

    let (raw_words, parse): (Vec<&Value>, WordParser) =
        if let Some(annotation) = &response.full_text_annotation {
            let raw: Vec<&Value> = annotation
                .pages
                .iter()
                .flat_map(|page| &page.blocks)
                .flat_map(|block| &block.paragraphs)
                .flat_map(|paragraph| &paragraph.words)
                .collect();
            (raw, document_word as WordParser)
        } else if !response.text_annotations.is_empty() {
            // The first annotation carries the text of the whole image.
            (
                response.text_annotations.iter().skip(1).collect(),
                annotation_word as WordParser,
            )
        } else {
            (response.saved_words().iter().collect(), saved_word as WordParser)
        };

    let mut words = Vec::with_capacity(raw_words.len());
    let mut low_confidence = 0_usize;
    for (index, raw) in raw_words.into_iter().enumerate() {
        let word = match parse(raw) {
            Ok(word) => word,
            Err(reason) => {
                warn!(word = index, %reason, "skipping unreadable OCR word");
                warnings.push(
                    ReconstructWarning::new(
                        WarningCode::WordSkipped,
                        format!("skipped unreadable word: {reason}"),
                    )
                    .with_word(index),
                );
                continue;
            }
        };

        let below_minimum = matches!(
            (word.confidence(), min_confidence),
            (Some(confidence), Some(minimum)) if confidence < minimum
        );
        if below_minimum {
            low_confidence += 1;
            continue;
        }
        words.push(word);
    }

    if low_confidence > 0 {
        warnings.push(ReconstructWarning::new(
            WarningCode::LowConfidenceWord,
            format!("dropped {low_confidence} word(s) below the confidence threshold"),
        ));
    }

    debug!(words = words.len(), "extracted OCR words");
    Ok(words)
}
