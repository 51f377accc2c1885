/// Errors returned by chart drivers.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ChartError {
    /// There was nothing to plot.
    #[display("chart has no data to draw")]
    #[from(ignore)]
    EmptyData,
    /// The drawing backend reported a failure.
    #[display("failed to draw chart: {message}")]
    #[from(ignore)]
    Draw { message: String },
    /// The statistics backing the chart could not be computed.
    #[display("failed to compute chart statistics: {_0}")]
    Stats(descry_stats::StatsError),
}

impl ChartError {
    pub(crate) fn draw<E>(err: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Draw {
            message: err.to_string(),
        }
    }
}
