//! Error types for the injection container.

use std::fmt;

/// Dependency injection errors
///
/// Every variant is a programmer error surfaced to the immediate caller.
/// Nothing in the container retries or falls back to a default instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Config, DiError, Parameters};
///
/// let config = Config::empty();
/// match config.instance_holder_for("missing", &Parameters::new()) {
///     Err(DiError::UnknownTypeConfig(name)) => assert_eq!(name, "missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_inject::DiError;
///
/// let too_deep = DiError::InjectionTooDeep(11);
/// let failure = DiError::ConfigProcessorFailure {
///     processor: "audit".to_string(),
///     reason: "backend offline".to_string(),
/// };
///
/// println!("Error: {}", too_deep);
/// println!("Error: {}", failure);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No type declaration registered under the requested name
    UnknownTypeConfig(String),
    /// Lifecycle policy name not recognized
    UnknownPolicy(String),
    /// A policy produced no usable instance
    ResolutionFailed(String),
    /// Injection attempted before the registry finished finalization
    NotFinalized,
    /// No target object supplied to the injector
    MissingTarget,
    /// No registry supplied, or the registry has been dropped
    MissingRegistry,
    /// Recursive field injection went past the depth ceiling
    InjectionTooDeep(usize),
    /// A configuration processor rejected; finalization aborted
    ConfigProcessorFailure {
        /// Registry name of the failing processor
        processor: String,
        /// Failure reported by the processor
        reason: String,
    },
    /// Downcast of a resolved instance failed
    TypeMismatch(String),
    /// Constructor parameter missing or of the wrong type
    InvalidParameter {
        /// Position in the parameter list
        index: usize,
        /// Expected Rust type
        expected: &'static str,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::UnknownTypeConfig(name) => write!(f, "Unknown type config: {}", name),
            DiError::UnknownPolicy(name) => write!(f, "Unknown lifecycle policy: {}", name),
            DiError::ResolutionFailed(name) => write!(f, "Resolution failed for: {}", name),
            DiError::NotFinalized => write!(f, "Registry is not finalized"),
            DiError::MissingTarget => write!(f, "Injection target is missing"),
            DiError::MissingRegistry => write!(f, "Registry is missing"),
            DiError::InjectionTooDeep(depth) => {
                write!(f, "Injection depth {} exceeded; use a provider to break the cycle", depth)
            }
            DiError::ConfigProcessorFailure { processor, reason } => {
                write!(f, "Config processor {} failed: {}", processor, reason)
            }
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::InvalidParameter { index, expected } => {
                write!(f, "Invalid parameter at {}: expected {}", index, expected)
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiResult, DiError};
///
/// fn check(finalized: bool) -> DiResult<()> {
///     if finalized { Ok(()) } else { Err(DiError::NotFinalized) }
/// }
///
/// assert!(check(true).is_ok());
/// assert_eq!(check(false), Err(DiError::NotFinalized));
/// ```
pub type DiResult<T> = Result<T, DiError>;
