use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Failures raised while computing a plan. None of them are recoverable inside
/// the engine; callers get the first one and no partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("no allocation type covers a horizon of {years} years (goal '{goal}')")]
    NoAllocationTypeForHorizon { goal: String, years: u32 },

    #[error("goal '{goal}' does not name a known allocation category")]
    UnknownGoalCategory { goal: String },

    #[error("goal '{goal}' has no years left but is still short by {shortfall:.2}")]
    ZeroHorizonShortfall { goal: String, shortfall: f64 },

    #[error("goal '{goal}' is {years} years out, beyond the {max}-year planning horizon")]
    HorizonTooLong { goal: String, years: u32, max: u32 },

    #[error(
        "contribution series is degenerate for {years} years at {growth_rate}% growth and {step_up}% step-up"
    )]
    DegenerateContributionSeries {
        years: u32,
        growth_rate: f64,
        step_up: f64,
    },

    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] ProviderError),
}

/// Failures of the data-access collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("failed to read snapshot: {0}")]
    Io(String),

    #[error("failed to parse snapshot: {0}")]
    Parse(String),

    #[error("{kind} {id} is referenced but not defined")]
    UnknownReference { kind: &'static str, id: i64 },
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
