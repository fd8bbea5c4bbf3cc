//! Converts many documents in parallel with one shared [`Markdown`] engine.
//!
//! The engine is built once from the batch options and borrowed by every
//! worker; each document still gets its own conversion context.
//!
//! ```
//! use solmark_batch::{BatchInput, BatchOptions, convert_batch};
//!
//! let inputs = vec![
//!     BatchInput::new("a.md", "# Hello"),
//!     BatchInput::new("b.md", "*World*"),
//! ];
//! let result = convert_batch(inputs, BatchOptions::default()).unwrap();
//! assert_eq!(result.stats.succeeded, 2);
//! assert_eq!(result.results[1].output.as_deref(), Some("<p><em>World</em></p>\n"));
//! ```

#![deny(missing_docs)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use solmark::{ConvertOptions, Markdown, MarkupError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// One document to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInput {
    /// Caller's identifier, typically a file path.
    pub id: String,
    /// Markdown source.
    pub source: String,
}

impl BatchInput {
    /// Pair an identifier with its source text.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// Outcome for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// Rendered markup (present on success).
    pub output: Option<String>,
    /// Warnings raised while converting, rendered as text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Counters for a finished batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Documents submitted.
    pub total: usize,
    /// Documents converted.
    pub succeeded: usize,
    /// Documents that failed.
    pub failed: usize,
    /// Documents never attempted because an earlier one failed.
    pub skipped: usize,
    /// Wall-clock time for the whole batch.
    pub processing_time_ms: f64,
}

/// Options for [`convert_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchOptions {
    /// Worker threads. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Keep going after a failed document. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Conversion options shared by every document.
    pub options: Option<ConvertOptions>,
}

impl BatchOptions {
    /// Deserialize batch options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// All results, in input order, plus statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProcessingResult {
    /// One entry per attempted input.
    pub results: Vec<BatchResult>,
    /// Counters.
    pub stats: BatchStats,
}

/// Convert every input with the same options.
///
/// Fails only when the options themselves are invalid. Per-document errors
/// such as an oversized input land in [`BatchResult::error`]. With
/// `continue_on_error` disabled the documents are converted in order and the
/// batch stops after the first failure.
pub fn convert_batch(
    inputs: Vec<BatchInput>,
    options: BatchOptions,
) -> Result<BatchProcessingResult, MarkupError> {
    let start = Instant::now();
    let continue_on_error = options.continue_on_error.unwrap_or(true);
    let engine = Markdown::new(options.options.unwrap_or_default())?;

    let pool = match options.max_threads {
        Some(threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| MarkupError::config(format!("thread pool: {}", e)))?,
        ),
        None => None,
    };

    let total = inputs.len();
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        match engine.convert_with_diagnostics(&input.source) {
            Ok(conversion) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    output: Some(conversion.output),
                    warnings: conversion
                        .diagnostics
                        .warnings
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::debug!("{} failed: {}", input.id, e);
                BatchResult {
                    id: input.id,
                    output: None,
                    warnings: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match &pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(total);
        for input in inputs {
            let result = process_input(input);
            let stop = result.error.is_some();
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    let stats = BatchStats {
        total,
        succeeded: succeeded.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        skipped: total - results.len(),
        processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    log::debug!(
        "batch of {} finished: {} ok, {} failed, {} skipped",
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.skipped
    );

    Ok(BatchProcessingResult { results, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solmark::{Dialect, convert};

    fn documents(count: usize) -> Vec<BatchInput> {
        (0..count)
            .map(|i| {
                BatchInput::new(
                    format!("doc{}.md", i),
                    format!("# Title {i}\n\nSome *text* with [a link][{i}].\n\n[{i}]: /page/{i}\n"),
                )
            })
            .collect()
    }

    #[test]
    fn parallel_matches_sequential() {
        let inputs = documents(32);
        let options = ConvertOptions::default();
        let expected: Vec<String> = inputs
            .iter()
            .map(|input| convert(&input.source, &options).unwrap())
            .collect();

        let batch = convert_batch(
            inputs,
            BatchOptions {
                max_threads: Some(4),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(batch.stats.total, 32);
        assert_eq!(batch.stats.succeeded, 32);
        for (i, result) in batch.results.iter().enumerate() {
            assert_eq!(result.id, format!("doc{}.md", i));
            assert_eq!(result.output.as_deref(), Some(expected[i].as_str()));
        }
    }

    #[test]
    fn failures_are_reported_per_document() {
        let inputs = vec![
            BatchInput::new("small", "ok"),
            BatchInput::new("large", "x".repeat(64)),
            BatchInput::new("after", "fine"),
        ];
        let options = ConvertOptions {
            max_input_bytes: 16,
            ..Default::default()
        };

        let batch = convert_batch(
            inputs.clone(),
            BatchOptions {
                options: Some(options.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(batch.stats.succeeded, 2);
        assert_eq!(batch.stats.failed, 1);
        assert!(batch.results[1].error.as_deref().unwrap().contains("input size"));

        let stopped = convert_batch(
            inputs,
            BatchOptions {
                continue_on_error: Some(false),
                options: Some(options),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(stopped.results.len(), 2);
        assert_eq!(stopped.stats.skipped, 1);
    }

    #[test]
    fn warnings_travel_with_results() {
        let batch = convert_batch(
            vec![BatchInput::new("refs", "[x][missing]")],
            BatchOptions::default(),
        )
        .unwrap();
        assert_eq!(
            batch.results[0].warnings,
            vec!["Unresolved link reference 'missing'".to_string()]
        );
    }

    #[test]
    fn options_from_json() {
        let options = BatchOptions::from_json(
            r#"{"maxThreads": 2, "continueOnError": false, "options": {"dialect": "extra"}}"#,
        )
        .unwrap();
        assert_eq!(options.max_threads, Some(2));
        assert_eq!(options.continue_on_error, Some(false));
        assert_eq!(options.options.unwrap().dialect, Dialect::Extra);
    }

    #[test]
    fn invalid_options_fail_the_batch() {
        let options = ConvertOptions {
            max_nesting_depth: 0,
            ..Default::default()
        };
        let err = convert_batch(
            documents(1),
            BatchOptions {
                options: Some(options),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MarkupError::Config(_)));
    }
}
