//! Error types for the LabSim engine.
//!
//! Stepping a scenario never fails: bad numeric input is clamped, solver
//! trouble degrades to a bounded approximation and unknown scenarios fall
//! back to a generic model. [`LabSimError`] therefore only covers the
//! configuration edges: custom waveform expressions, sweep ranges, simulator
//! configuration, parameter files and CSV output.

use thiserror::Error;

/// Result type alias using [`LabSimError`].
pub type Result<T> = std::result::Result<T, LabSimError>;

/// Unified error type for all LabSim operations.
#[derive(Error, Debug)]
pub enum LabSimError {
    // ============ Expression Errors ============
    /// Error during lexical analysis of a waveform expression
    #[error("Lexer error at column {column}: {message}")]
    LexerError { column: usize, message: String },

    /// Error while parsing a waveform expression
    #[error("Parse error at column {column}: {message}")]
    ParseError { column: usize, message: String },

    /// Call to a function the expression language does not know
    #[error("Unknown function '{name}' in expression")]
    UnknownFunction { name: String },

    /// Function called with the wrong number of arguments
    #[error("Function '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    // ============ Simulation Errors ============
    /// Invalid sweep range
    #[error("Invalid sweep over '{param}': {message}")]
    InvalidSweep { param: String, message: String },

    /// Invalid simulation parameter or configuration value
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    // ============ I/O Errors ============
    /// Malformed `key=value` parameter assignment
    #[error("Invalid parameter assignment '{input}': {message}")]
    ParamParseError { input: String, message: String },

    /// Error reading a parameter or configuration file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error writing CSV output
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LabSimError {
    /// Create a lexer error
    pub fn lexer(column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(column: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            column,
            message: message.into(),
        }
    }

    /// Create an invalid sweep error
    pub fn invalid_sweep(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSweep {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }
}
