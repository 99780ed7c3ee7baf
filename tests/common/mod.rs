#![allow(dead_code)]

use std::path::Path;

use ocr_table_rebuild::{Vertex, Word};
use serde_json::{Value, json};

/// A token placed by its center point, as a table screenshot would yield it.
pub struct Placed<'a> {
    pub text: &'a str,
    pub x: i32,
    pub y: i32,
}

pub fn placed(text: &str, x: i32, y: i32) -> Placed<'_> {
    Placed { text, x, y }
}

fn box_vertices(x: i32, y: i32) -> [Vertex; 4] {
    [
        Vertex::new(x - 8, y - 6),
        Vertex::new(x + 8, y - 6),
        Vertex::new(x + 8, y + 6),
        Vertex::new(x - 8, y + 6),
    ]
}

pub fn word(text: &str, x: i32, y: i32) -> Word {
    Word::new(text, box_vertices(x, y), None)
}

/// Lays out `rows` of tokens at the given x-centers, one row every 40px.
pub fn grid(rows: &[Vec<(&'static str, i32)>]) -> Vec<Placed<'static>> {
    rows.iter()
        .zip(0..)
        .flat_map(|(row, index)| {
            row.iter()
                .map(move |&(text, x)| placed(text, x, 100 + index * 40))
        })
        .collect()
}

/// Builds a nested document annotation with one word per symbol run.
pub fn document_response(words: &[Placed<'_>]) -> Value {
    let words = words
        .iter()
        .map(|word| {
            let symbols = word
                .text
                .chars()
                .map(|ch| json!({"text": ch.to_string()}))
                .collect::<Vec<_>>();
            let vertices = box_vertices(word.x, word.y)
                .iter()
                .map(|v| json!({"x": v.x, "y": v.y}))
                .collect::<Vec<_>>();
            json!({
                "symbols": symbols,
                "boundingBox": {"vertices": vertices},
                "confidence": 0.95
            })
        })
        .collect::<Vec<_>>();

    json!({
        "fullTextAnnotation": {
            "pages": [{"blocks": [{"paragraphs": [{"words": words}]}]}]
        }
    })
}

/// Builds a flat annotation list; the first entry holds the full text.
pub fn annotation_response(words: &[Placed<'_>]) -> Value {
    let full_text = words.iter().map(|w| w.text).collect::<Vec<_>>().join(" ");
    let mut annotations = vec![json!({"description": full_text})];
    annotations.extend(words.iter().map(|word| {
        let vertices = box_vertices(word.x, word.y)
            .iter()
            .map(|v| json!({"x": v.x, "y": v.y}))
            .collect::<Vec<_>>();
        json!({"description": word.text, "boundingPoly": {"vertices": vertices}})
    }));
    json!({ "textAnnotations": annotations })
}

pub fn write_json(path: &Path, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
