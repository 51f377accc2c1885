/// Errors returned by fallible statistical operations.
///
/// Degenerate numeric input is reported through this type instead of a silent
/// sentinel value, so callers always know why a measure is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// The sample contains no observations.
    #[display("sample is empty")]
    EmptySample,
    /// The sample is too small for the requested measure.
    #[display("measure requires at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    /// A measure that divides by a standard deviation was given a constant sample.
    #[display("sample has zero variance")]
    ZeroVariance,
    /// Paired sequences do not have the same length.
    #[display("paired sequences differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    /// A binning was requested with zero classes.
    #[display("number of classes must be at least 1")]
    InvalidClassCount,
    /// A binning was requested with more classes than observations.
    #[display("cannot bin {sample_size} observations into {requested} classes")]
    TooManyClasses { requested: usize, sample_size: usize },
}
