//! Testing utilities
//!
//! Tests should read flowed documents through [FlowedSources] instead of spelling out long
//! documents inline. The sample files under `samples/` are the vetted corpus: when the
//! language changes, they are the one place that needs updating.
//!
//! ```rust,ignore
//! use naturally::flowed::testing::FlowedSources;
//!
//! let source = FlowedSources::get_string("basic.flowed")?;
//! let document = naturally::compile(&source)?;
//! ```
//!
//! Short snippets that exercise a single phrase are fine inline.

use std::fs;
use std::path::PathBuf;

/// Samples that compile successfully
pub const VALID_SAMPLES: &[&str] = &[
    "basic.flowed",
    "conditional.flowed",
    "duplicate-task.flowed",
    "no-params.flowed",
    "precedence.flowed",
];

/// Samples that must be rejected
pub const INVALID_SAMPLES: &[&str] = &["missing-tasks.flowed", "malformed-literal.flowed"];

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("sample '{0}' is not available")]
    NotAvailable(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

pub struct FlowedSources;

impl FlowedSources {
    /// Directory holding the sample documents.
    pub fn samples_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    pub fn list_samples() -> Vec<&'static str> {
        VALID_SAMPLES
            .iter()
            .chain(INVALID_SAMPLES.iter())
            .copied()
            .collect()
    }

    pub fn get_string(filename: &str) -> Result<String, SampleError> {
        if !Self::list_samples().contains(&filename) {
            return Err(SampleError::NotAvailable(filename.to_string()));
        }
        let path = Self::samples_dir().join(filename);
        fs::read_to_string(&path).map_err(|source| SampleError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_is_readable() {
        for name in FlowedSources::list_samples() {
            let content = FlowedSources::get_string(name).unwrap();
            assert!(
                content.starts_with("Define a flow named"),
                "{} does not start with a flow header",
                name
            );
        }
    }

    #[test]
    fn test_unknown_sample() {
        assert!(matches!(
            FlowedSources::get_string("nope.flowed"),
            Err(SampleError::NotAvailable(_))
        ));
    }
}
