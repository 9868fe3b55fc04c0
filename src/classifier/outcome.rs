//! # Classification outcome.
//!
//! [`ClassificationOutcome`] is created fresh per `classify` call. Coherence is
//! derived from the absence of a [`Diagnostic`], so an outcome cannot claim to
//! be coherent while carrying one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Context label for entropy found in the input.
pub const CONTEXT_ENTROPY: &str = "EntropyDetected";
/// Context label for faults inside the classifier itself.
pub const CONTEXT_INGESTION: &str = "ingestion";
/// Fixed diagnostic note.
pub const NOTE_REQUIRES_INTEGRATION: &str = "requires integration";

/// Why an input was judged entropic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntropyKind {
    /// The input is a failure raised by a collaborator.
    Exception,
    /// Text that looks like an error message.
    StringError,
    /// Absent or empty input.
    EmptySignal,
    /// Classification itself faulted.
    PrismInternal,
}

impl EntropyKind {
    /// Stable name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EntropyKind::Exception => "Exception",
            EntropyKind::StringError => "StringError",
            EntropyKind::EmptySignal => "EmptySignal",
            EntropyKind::PrismInternal => "PrismInternal",
        }
    }
}

/// Structured metadata attached to an entropic outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Classification tag.
    pub kind: EntropyKind,
    /// The input echoed back: the mapping unchanged, otherwise its string rendering.
    pub raw_rendering: Value,
    /// Where the entropy was found.
    pub context: String,
    /// Human-readable note.
    pub note: String,
}

impl Diagnostic {
    pub(crate) fn entropy(kind: EntropyKind, raw_rendering: Value) -> Self {
        Self {
            kind,
            raw_rendering,
            context: CONTEXT_ENTROPY.to_string(),
            note: NOTE_REQUIRES_INTEGRATION.to_string(),
        }
    }

    pub(crate) fn internal(description: String) -> Self {
        Self {
            kind: EntropyKind::PrismInternal,
            raw_rendering: Value::String(description),
            context: CONTEXT_INGESTION.to_string(),
            note: NOTE_REQUIRES_INTEGRATION.to_string(),
        }
    }
}

/// Result of classifying one signal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    /// Recovered payload, if any.
    pub factual_content: Option<Value>,
    /// Present only when the input was entropic.
    pub diagnostic: Option<Diagnostic>,
}

impl ClassificationOutcome {
    /// Ordinary data passed through unchanged.
    pub fn coherent(content: Value) -> Self {
        Self {
            factual_content: Some(content),
            diagnostic: None,
        }
    }

    /// Entropic input with a diagnostic and whatever content could be recovered.
    pub fn entropic(diagnostic: Diagnostic, factual_content: Option<Value>) -> Self {
        Self {
            factual_content,
            diagnostic: Some(diagnostic),
        }
    }

    /// `true` iff no diagnostic is attached.
    #[inline]
    pub fn is_coherent(&self) -> bool {
        self.diagnostic.is_none()
    }

    /// Kind of the attached diagnostic, if any.
    #[inline]
    pub fn kind(&self) -> Option<EntropyKind> {
        self.diagnostic.as_ref().map(|d| d.kind)
    }

    /// Consumes the outcome, returning the recovered content.
    pub fn into_content(self) -> Option<Value> {
        self.factual_content
    }
}
