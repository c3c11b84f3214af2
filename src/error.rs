/// failure codes surfaced to the caller.
///
/// resource contention discovered during the search is not an Error.
/// the driver recovers locally and reports it as a reason code on the
/// unscheduled list instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// bad field shape, out-of-range value, or unknown enum token.
    /// raised before any scheduling work begins.
    #[error("invalid-input-field at {place}: {reason}")]
    InvalidInputField { place: String, reason: String },

    /// a (wire band, equivalent) pair with no cycle-time row
    #[error("constants-lookup-miss: {0}")]
    ConstantsLookupMiss(String),

    /// no method/variant combination produced a schedule
    #[error("no-feasible-schedule")]
    NoFeasibleSchedule,

    /// a required resource cannot be supplied in any configuration
    #[error("resource-exhausted: {0}")]
    ResourceExhausted(String),

    /// an on-table-today job sits on an inactive cell and no active
    /// cell can take a job of its scheduling class
    #[error("infeasible-on-table-today: job {0}")]
    InfeasibleOnTableToday(String),
}

impl Error {
    pub fn field(place: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInputField {
            place: place.into(),
            reason: reason.into(),
        }
    }
}
