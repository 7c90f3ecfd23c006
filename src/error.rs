//! Error taxonomy for the MOVNS core.
//!
//! Mirrors the hand-written enum + manual `Display`/`Error` style the
//! planner already uses for its OSRM client error (`osrm::OsrmRouteError`)
//! rather than pulling in a derive-macro error crate.

use std::fmt;

/// Errors raised while validating a [`crate::driver::DriverConfig`] before a
/// run starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A parameter was zero or negative where a positive value is required.
    NotPositive { field: &'static str, value: f64 },
    /// A parameter fell outside its documented valid range.
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NotPositive { field, value } => {
                write!(f, "configuration field `{field}` must be positive, got {value}")
            }
            ConfigurationError::OutOfRange { field, value, min, max } => {
                write!(f, "configuration field `{field}` = {value} outside [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Fatal data problems discovered while building [`crate::catalog::ProblemData`]
/// or before the driver's first outer loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A required travel matrix entry for a mode that legs depend on is
    /// absent or non-positive-finite.
    MissingMatrix { mode: crate::catalog::TravelMode },
    /// An attraction was given a non-positive visit duration.
    NonPositiveVisitDuration { attraction: crate::catalog::AttractionId },
    /// The attraction catalog is empty.
    EmptyCatalog,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingMatrix { mode } => write!(f, "missing travel matrix for mode {mode:?}"),
            DataError::NonPositiveVisitDuration { attraction } => {
                write!(f, "attraction {attraction:?} has non-positive visit duration")
            }
            DataError::EmptyCatalog => write!(f, "attraction catalog has zero attractions"),
        }
    }
}

impl std::error::Error for DataError {}

/// Top-level error returned by [`crate::driver::Driver::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    Configuration(ConfigurationError),
    Data(DataError),
    /// Seeding produced no feasible solution at all.
    EmptyArchive,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Configuration(e) => write!(f, "invalid configuration: {e}"),
            DriverError::Data(e) => write!(f, "data error: {e}"),
            DriverError::EmptyArchive => write!(f, "no feasible seed could be constructed"),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<ConfigurationError> for DriverError {
    fn from(e: ConfigurationError) -> Self {
        DriverError::Configuration(e)
    }
}

impl From<DataError> for DriverError {
    fn from(e: DataError) -> Self {
        DriverError::Data(e)
    }
}

/// Exit status codes for any CLI wrapper around the core (§6 of the spec).
/// The core never calls `std::process::exit` itself; this is a pure mapping.
pub fn exit_code(result: &Result<(), DriverError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(DriverError::Configuration(_)) => 2,
        Err(DriverError::Data(_)) => 3,
        Err(DriverError::EmptyArchive) => 4,
    }
}

/// Recoverable evaluation failure for a single candidate solution. Never
/// surfaced past [`crate::repair::repair`] — candidates that fail to
/// evaluate are repaired or skipped, never propagated as a driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// Arrival time plus visit duration exceeds the day window (20:00).
    InfeasibleTime,
    /// Arrival at a POI falls outside its opening hours.
    InfeasibleOpening,
    /// The same attraction id appears more than once across both days.
    DuplicatePoi,
    /// A leg's assigned mode has no feasible matrix entry.
    InvalidMode,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            EvalError::InfeasibleTime => "day window exceeded",
            EvalError::InfeasibleOpening => "arrival outside opening hours",
            EvalError::DuplicatePoi => "duplicate attraction across days",
            EvalError::InvalidMode => "infeasible transport mode for leg",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_contract() {
        assert_eq!(exit_code(&Ok(())), 0);
        assert_eq!(
            exit_code(&Err(DriverError::Configuration(ConfigurationError::NotPositive {
                field: "archive_max",
                value: 0.0
            }))),
            2
        );
        assert_eq!(exit_code(&Err(DriverError::Data(DataError::EmptyCatalog))), 3);
        assert_eq!(exit_code(&Err(DriverError::EmptyArchive)), 4);
    }
}
