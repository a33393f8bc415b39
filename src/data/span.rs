//! Span examples in the `(text, {"entities": [(start, end, label)]})` exchange shape.

use serde::{Deserialize, Serialize};

/// Labelled character span within a [`SpanExample`]'s text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "(usize, usize, String)",
    from = "(usize, usize, String)"
)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

impl From<EntitySpan> for (usize, usize, String) {
    fn from(span: EntitySpan) -> Self {
        (span.start, span.end, span.label)
    }
}

impl From<(usize, usize, String)> for EntitySpan {
    fn from((start, end, label): (usize, usize, String)) -> Self {
        Self { start, end, label }
    }
}

/// Entity annotations attached to a [`SpanExample`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub entities: Vec<EntitySpan>,
}

/// Training example consumed by the downstream NER trainer.
///
/// Serializes as a two element array, `["text", {"entities": [[0, 9, "PER"]]}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "(String, Annotations)", from = "(String, Annotations)")]
pub struct SpanExample {
    pub text: String,
    pub entities: Vec<EntitySpan>,
}

impl SpanExample {
    pub fn new(text: impl Into<String>, entities: Vec<EntitySpan>) -> Self {
        Self {
            text: text.into(),
            entities,
        }
    }
}

impl From<SpanExample> for (String, Annotations) {
    fn from(example: SpanExample) -> Self {
        (
            example.text,
            Annotations {
                entities: example.entities,
            },
        )
    }
}

impl From<(String, Annotations)> for SpanExample {
    fn from((text, annotations): (String, Annotations)) -> Self {
        Self {
            text,
            entities: annotations.entities,
        }
    }
}
