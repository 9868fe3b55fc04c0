//! # Signal classification.
//!
//! [`Classifier`] decides whether a [`Signal`] is coherent (ordinary data) or
//! entropic (failure-shaped, error-looking text, or empty), and recovers the
//! factual content it can.
//!
//! ## Decision order (first match wins)
//! ```text
//! Failure(_)                          ─► Exception
//! Data(String) containing error|exception (any case) ─► StringError
//! Data(Null | "" | [] | {})           ─► EmptySignal
//! Data(_)                             ─► coherent, content = input
//! ```
//!
//! ## Rules
//! - `classify` is total: a panic anywhere in decision or extraction is caught
//!   at one boundary and turned into a `PrismInternal` outcome.
//! - Extraction runs in its own guard; if it faults, content is `None` and the
//!   diagnostic is kept.
//! - No state is carried between calls.
//!
//! ## Panic hook
//! Caught panics still run the process panic hook, so an internal fault also
//! shows up on stderr (default hook) in addition to the `PrismInternal` outcome.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::outcome::{ClassificationOutcome, Diagnostic, EntropyKind};
use super::signal::{Payload, Signal};
use crate::error::panic_message;

/// Stateless classifier. Cheap to copy and safe to call from any thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier;

impl Classifier {
    /// Construct a new [`Classifier`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies a signal. Never panics.
    ///
    /// ## Example
    /// ```rust
    /// use klipper_client::Classifier;
    ///
    /// let outcome = Classifier::new().classify("Hello World");
    /// assert!(outcome.is_coherent());
    /// assert_eq!(outcome.factual_content, Some("Hello World".into()));
    /// ```
    pub fn classify<'a>(&self, signal: impl Into<Signal<'a>>) -> ClassificationOutcome {
        let signal = signal.into();

        match panic::catch_unwind(AssertUnwindSafe(|| refract(&signal))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let description = panic_message(payload.as_ref());
                warn!(fault = %description, "classification faulted");
                ClassificationOutcome::entropic(Diagnostic::internal(description), None)
            }
        }
    }

    /// Acknowledges the diagnostic (if any) and integrates the factual content.
    ///
    /// Returns `true` iff `factual_content` is present, regardless of coherence.
    pub fn commit(&self, outcome: &ClassificationOutcome) -> bool {
        if let Some(diagnostic) = &outcome.diagnostic {
            info!(
                kind = diagnostic.kind.as_str(),
                context = %diagnostic.context,
                "acknowledging entropy"
            );
        }

        match &outcome.factual_content {
            Some(content) => {
                debug!(content_type = value_type_name(content), "integrating factual content");
                true
            }
            None => false,
        }
    }
}

fn refract(signal: &Signal<'_>) -> ClassificationOutcome {
    let payload = &signal.payload;
    debug!(
        payload = payload_label(payload),
        source = signal.source.as_deref().unwrap_or("-"),
        "classifying signal"
    );

    let kind = match payload {
        Payload::Failure(_) => EntropyKind::Exception,
        Payload::Data(Value::String(text)) if looks_like_error(text) => EntropyKind::StringError,
        Payload::Data(value) if is_empty(value) => EntropyKind::EmptySignal,
        Payload::Data(value) => return ClassificationOutcome::coherent(value.clone()),
    };

    let diagnostic = Diagnostic::entropy(kind, raw_rendering(payload));
    let content = match panic::catch_unwind(AssertUnwindSafe(|| extract(payload))) {
        Ok(content) => Some(content),
        Err(fault) => {
            debug!(fault = %panic_message(fault.as_ref()), "factual extraction failed");
            None
        }
    };

    ClassificationOutcome::entropic(diagnostic, content)
}

fn looks_like_error(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("error") || lower.contains("exception")
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn raw_rendering(payload: &Payload<'_>) -> Value {
    match payload {
        Payload::Failure(failure) => Value::String(failure.render()),
        Payload::Data(map @ Value::Object(_)) => map.clone(),
        Payload::Data(Value::String(text)) => Value::String(text.clone()),
        Payload::Data(other) => Value::String(other.to_string()),
    }
}

fn extract(payload: &Payload<'_>) -> Value {
    match payload {
        Payload::Failure(failure) => json!({
            "error_type": failure.type_name(),
            "error_message": failure.render(),
            "diagnostic": "integrity check required",
        }),
        Payload::Data(Value::String(text)) => json!({
            "message": text,
            "diagnostic": "textual entropy detected",
        }),
        Payload::Data(map @ Value::Object(_)) => map.clone(),
        Payload::Data(other) => json!({
            "type": value_type_name(other),
            "diagnostic": "non-textual entropy",
        }),
    }
}

fn payload_label(payload: &Payload<'_>) -> &'static str {
    match payload {
        Payload::Failure(failure) => failure.type_name(),
        Payload::Data(value) => value_type_name(value),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::signal::Failure;
    use std::cell::Cell;
    use std::fmt;

    #[derive(Debug)]
    struct ValueError(&'static str);

    impl fmt::Display for ValueError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for ValueError {}

    /// Error whose `Display` always panics.
    #[derive(Debug)]
    struct Unprintable;

    impl fmt::Display for Unprintable {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("no rendering available")
        }
    }

    impl std::error::Error for Unprintable {}

    /// Error whose `Display` works once, then panics.
    #[derive(Debug, Default)]
    struct Flaky {
        renders: Cell<u32>,
    }

    impl fmt::Display for Flaky {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let n = self.renders.get();
            self.renders.set(n + 1);
            if n > 0 {
                panic!("rendered twice");
            }
            f.write_str("flaky failure")
        }
    }

    impl std::error::Error for Flaky {}

    #[test]
    fn test_coherent_values_pass_through() {
        let c = Classifier::new();
        for input in [
            json!("Hello World"),
            json!(42),
            json!(0),
            json!(false),
            json!({"key": "value"}),
            json!(["a", "b"]),
        ] {
            let outcome = c.classify(input.clone());
            assert!(outcome.is_coherent(), "{input} should be coherent");
            assert_eq!(outcome.factual_content, Some(input));
            assert!(outcome.diagnostic.is_none());
        }
    }

    #[test]
    fn test_failure_is_exception() {
        let err = ValueError("Test error message");
        let outcome = Classifier::new().classify(Failure::of(&err));

        assert!(!outcome.is_coherent());
        let diagnostic = outcome.diagnostic.as_ref().unwrap();
        assert_eq!(diagnostic.kind, EntropyKind::Exception);
        assert_eq!(diagnostic.raw_rendering, json!("Test error message"));
        assert_eq!(diagnostic.context, "EntropyDetected");
        assert_eq!(diagnostic.note, "requires integration");

        let content = outcome.factual_content.unwrap();
        assert_eq!(content["error_type"], "ValueError");
        assert_eq!(content["error_message"], "Test error message");
        assert_eq!(content["diagnostic"], "integrity check required");
    }

    #[test]
    fn test_error_like_text() {
        let c = Classifier::new();
        for text in ["This is an error message", "NullPointerEXCEPTION", "ERROR"] {
            let outcome = c.classify(text);
            assert_eq!(outcome.kind(), Some(EntropyKind::StringError), "{text}");
            assert_eq!(
                outcome.factual_content,
                Some(json!({"message": text, "diagnostic": "textual entropy detected"}))
            );
        }
    }

    #[test]
    fn test_empty_inputs() {
        let c = Classifier::new();

        let none = c.classify(None::<Value>);
        assert!(!none.is_coherent());
        assert_eq!(none.kind(), Some(EntropyKind::EmptySignal));
        assert_eq!(none.diagnostic.as_ref().unwrap().raw_rendering, json!("null"));
        assert_eq!(
            none.factual_content,
            Some(json!({"type": "null", "diagnostic": "non-textual entropy"}))
        );

        let empty_text = c.classify("");
        assert_eq!(empty_text.kind(), Some(EntropyKind::EmptySignal));
        assert_eq!(empty_text.factual_content.unwrap()["message"], "");

        let empty_list = c.classify(json!([]));
        assert_eq!(empty_list.kind(), Some(EntropyKind::EmptySignal));
        assert_eq!(empty_list.factual_content.unwrap()["type"], "array");

        let empty_map = c.classify(json!({}));
        assert_eq!(empty_map.kind(), Some(EntropyKind::EmptySignal));
        assert_eq!(empty_map.diagnostic.unwrap().raw_rendering, json!({}));
        assert_eq!(empty_map.factual_content, Some(json!({})));
    }

    #[test]
    fn test_failure_precedes_text_heuristic() {
        let err = ValueError("");
        let outcome = Classifier::new().classify(Failure::of(&err));
        assert_eq!(outcome.kind(), Some(EntropyKind::Exception));
    }

    #[test]
    fn test_unprintable_failure_is_internal() {
        let err = Unprintable;
        let outcome = Classifier::new().classify(Failure::of(&err));

        assert!(!outcome.is_coherent());
        assert!(outcome.factual_content.is_none());
        let diagnostic = outcome.diagnostic.unwrap();
        assert_eq!(diagnostic.kind, EntropyKind::PrismInternal);
        assert_eq!(diagnostic.context, "ingestion");
        assert_eq!(diagnostic.raw_rendering, json!("no rendering available"));
    }

    #[test]
    fn test_failed_extraction_keeps_diagnostic() {
        let err = Flaky::default();
        let outcome = Classifier::new().classify(Failure::of(&err));

        assert_eq!(outcome.kind(), Some(EntropyKind::Exception));
        assert_eq!(
            outcome.diagnostic.as_ref().unwrap().raw_rendering,
            json!("flaky failure")
        );
        assert!(outcome.factual_content.is_none());
    }

    #[test]
    fn test_commit_tracks_content_presence() {
        let c = Classifier::new();

        assert!(c.commit(&ClassificationOutcome::coherent(json!("good data"))));

        let nothing = ClassificationOutcome::entropic(
            Diagnostic::entropy(EntropyKind::EmptySignal, json!("null")),
            None,
        );
        assert!(!c.commit(&nothing));

        let mixed = ClassificationOutcome::entropic(
            Diagnostic::entropy(EntropyKind::StringError, json!("x")),
            Some(json!("extracted truth")),
        );
        assert!(c.commit(&mixed));
    }

    #[test]
    fn test_commit_does_not_affect_later_calls() {
        let c = Classifier::new();
        let first = c.classify("stable");
        c.commit(&first);
        assert_eq!(c.classify("stable"), first);
    }
}
