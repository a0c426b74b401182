//! Error taxonomy.
//!
//! Three families, each raised at a well-defined point of a run:
//!
//! | Error | Raised | Meaning |
//! |-------|--------|---------|
//! | [`Error::Validation`] | instance load | Malformed instance data |
//! | [`Error::Configuration`] | search setup | Bad objective registration or parameters |
//! | [`Error::Decode`] | during a generation | Internally inconsistent encoding (operator defect) |
//!
//! A [`DecodeError`] is never repaired: it aborts the run, since a silently
//! fixed encoding would corrupt the dominance and archive guarantees.

use std::fmt::{self, Display, Formatter};

use crate::validation::ValidationError;

/// Crate-level error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The instance failed structural validation. All detected problems are listed.
    Validation(Vec<ValidationError>),
    /// The search or objective configuration is invalid.
    Configuration(ConfigurationError),
    /// An encoded solution could not be decoded.
    Decode(DecodeError),
    /// An FJSPLIB text could not be parsed.
    Parse(ParseError),
}

/// Setup-time configuration problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No objectives were registered.
    NoObjectives,
    /// An objective was registered with an empty name.
    EmptyObjectiveName,
    /// Two objectives share a name.
    DuplicateObjective(String),
    /// An objective name does not match any built-in objective.
    UnknownObjective(String),
    /// Population must hold at least two individuals.
    PopulationTooSmall(usize),
    /// Archive capacity must be at least one.
    InvalidArchiveCapacity(usize),
    /// At least one generation must be allowed.
    InvalidGenerationCount(usize),
    /// A stagnation limit, when set, must be at least one generation.
    InvalidStagnationLimit(usize),
    /// Tournament size must be at least one.
    InvalidTournamentSize(usize),
    /// A probability parameter is outside `[0, 1]`.
    InvalidProbability {
        /// Parameter name.
        parameter: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A generator parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        parameter: &'static str,
        /// Constraint that was violated.
        reason: &'static str,
    },
    /// A hypervolume reference point has the wrong dimension.
    ReferencePointDimension {
        /// Number of registered objectives.
        expected: usize,
        /// Length of the supplied reference point.
        found: usize,
    },
}

/// Inconsistencies detected while decoding an encoded solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The operation sequence has the wrong number of genes.
    SequenceLength {
        /// Number of operations in the instance.
        expected: usize,
        /// Number of genes found.
        found: usize,
    },
    /// The machine assignment has the wrong number of entries.
    AssignmentLength {
        /// Number of operations in the instance.
        expected: usize,
        /// Number of entries found.
        found: usize,
    },
    /// A sequence gene names a job that does not exist.
    UnknownJob(usize),
    /// A job appears more often in the sequence than it has operations.
    JobOverflow {
        /// Job index.
        job: usize,
        /// Number of operations of that job.
        operations: usize,
    },
    /// An operation is assigned to a machine outside its candidate set.
    IneligibleMachine {
        /// Operation id.
        operation: usize,
        /// Assigned machine.
        machine: usize,
    },
    /// The machine layers do not match the instance's machine count.
    LayerCount {
        /// Number of machines.
        expected: usize,
        /// Number of layers found.
        found: usize,
    },
    /// A machine layer lists an operation that is assigned elsewhere (or does not exist).
    MisplacedOperation {
        /// Operation id.
        operation: usize,
        /// Machine whose layer lists it.
        machine: usize,
    },
    /// An operation is listed in more than one layer position.
    DuplicateOperation(usize),
    /// An operation is missing from every layer.
    MissingOperation(usize),
    /// Layer order and job precedence wait on each other.
    Deadlock {
        /// Operations placed before progress stopped.
        placed: usize,
        /// Total number of operations.
        total: usize,
    },
}

/// Error raised while reading an FJSPLIB text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number (0 when the text is empty).
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "instance validation failed:")?;
                for e in errors {
                    write!(f, " [{:?}] {};", e.kind, e.message)?;
                }
                Ok(())
            }
            Self::Configuration(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoObjectives => write!(f, "at least one objective must be registered"),
            Self::EmptyObjectiveName => write!(f, "objective names must not be empty"),
            Self::DuplicateObjective(name) => write!(f, "objective '{name}' registered twice"),
            Self::UnknownObjective(name) => write!(f, "unknown objective '{name}'"),
            Self::PopulationTooSmall(size) => {
                write!(f, "population size must be at least 2 (received {size})")
            }
            Self::InvalidArchiveCapacity(cap) => {
                write!(f, "archive capacity must be at least 1 (received {cap})")
            }
            Self::InvalidGenerationCount(count) => {
                write!(f, "max generations must be at least 1 (received {count})")
            }
            Self::InvalidStagnationLimit(limit) => {
                write!(f, "stagnation limit must be at least 1 (received {limit})")
            }
            Self::InvalidTournamentSize(size) => {
                write!(f, "tournament size must be at least 1 (received {size})")
            }
            Self::InvalidProbability { parameter, value } => {
                write!(f, "{parameter} must be within [0, 1] (received {value})")
            }
            Self::InvalidParameter { parameter, reason } => write!(f, "{parameter} {reason}"),
            Self::ReferencePointDimension { expected, found } => write!(
                f,
                "reference point has {found} coordinates but {expected} objectives are registered"
            ),
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequenceLength { expected, found } => {
                write!(f, "sequence has {found} genes, expected {expected}")
            }
            Self::AssignmentLength { expected, found } => {
                write!(f, "assignment has {found} entries, expected {expected}")
            }
            Self::UnknownJob(job) => write!(f, "sequence references unknown job {job}"),
            Self::JobOverflow { job, operations } => write!(
                f,
                "job {job} occurs more than its {operations} operations in the sequence"
            ),
            Self::IneligibleMachine { operation, machine } => write!(
                f,
                "operation {operation} assigned to machine {machine} outside its candidates"
            ),
            Self::LayerCount { expected, found } => {
                write!(f, "{found} machine layers given, expected {expected}")
            }
            Self::MisplacedOperation { operation, machine } => write!(
                f,
                "machine {machine} layer lists operation {operation} which is not assigned to it"
            ),
            Self::DuplicateOperation(op) => write!(f, "operation {op} listed more than once"),
            Self::MissingOperation(op) => write!(f, "operation {op} missing from machine layers"),
            Self::Deadlock { placed, total } => write!(
                f,
                "machine order deadlocks against job precedence after {placed} of {total} operations"
            ),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for Error {}
impl std::error::Error for ConfigurationError {}
impl std::error::Error for DecodeError {}
impl std::error::Error for ParseError {}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
