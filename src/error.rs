//! Error types
//!
//! Contract violations (vector dimensions) panic with `VectorError`'s message;
//! everything a learner or a config file can get wrong is a recoverable error.

use thiserror::Error;

/// Vector arithmetic on mismatched inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("cannot add vectors of different dimension ({left} and {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Failures while compiling or evaluating a user expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("expected ')'")]
    UnclosedParen,
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("function '{name}' takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("evaluation stack underflow")]
    StackUnderflow,
    #[error("expression is nested too deeply")]
    TooDeep,
    #[error("expression is too long ({0} tokens)")]
    TooLong(usize),
}

/// Invalid edits to a closed-form function
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuncError {
    #[error("invalid root '{0}'")]
    InvalidRoot(String),
}

/// Invalid coordinate transform configuration
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    #[error("transform scale must be non-zero (x: {x_scale}, y: {y_scale})")]
    ZeroScale { x_scale: f64, y_scale: f64 },
}

/// Invalid level configuration
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no built-in level {0}")]
    UnknownLevel(u32),
    #[error("main scene '{0}' is not enabled by the level")]
    MainSceneDisabled(&'static str),
    #[error("malformed level: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unusable settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("{name} must be positive and finite, got {value}")]
    InvalidStep { name: &'static str, value: f64 },
    #[error("{name} must run from low to high, got [{start}, {end}]")]
    InvalidRange {
        name: &'static str,
        start: f64,
        end: f64,
    },
}

/// Corrupt persisted attempt records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has {formulas} formulas but {times} times")]
    LengthMismatch { formulas: usize, times: usize },
    #[error("invalid time entry '{0}'")]
    InvalidTime(String),
}

/// Rejected session commands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("inputs are locked while an attempt is running or won")]
    InputLocked,
    #[error("level has no {0} input")]
    NoSuchInput(&'static str),
    #[error(transparent)]
    Func(#[from] FuncError),
    #[error(transparent)]
    Expr(#[from] ExprError),
}
