use chrono::NaiveDate;
use thiserror::Error;

/// Process-level error: a message plus the exit code `genhol` terminates with.
///
/// Exit codes:
/// - `2`: bad input, configuration, or local IO
/// - `3`: no usable holiday data, or the effect boundary rejected its input
/// - `4`: upstream fetch failure (ANBIMA / SIDRA)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Named failures of the holiday core and the effect-generation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HolidayError {
    /// A holiday column had no dates at all for the selected rows.
    #[error("The column {column} contains no valid dates.")]
    EmptyEffectInput { column: &'static str },

    /// An override maps to a date that is itself an override key.
    #[error("Override table is not disjoint: {date} is both a source and a target date.")]
    OverlappingOverride { date: NaiveDate },

    #[error("Date vector is empty.")]
    EmptyDateVector,

    #[error("Invalid effect window: start {start} is after end {end}.")]
    InvalidWindow { start: i64, end: i64 },

    #[error("Invalid effect window [{start}, {end}]: offsets must stay within {limit} days of the holiday.")]
    WindowOutOfRange { start: i64, end: i64, limit: i64 },

    #[error("Unsupported frequency {0} (expected 4 or 12).")]
    UnsupportedFrequency(u32),

    #[error("Invalid effect date '{0}' (expected YYYY-MM-DD).")]
    InvalidEffectDate(String),
}

impl From<HolidayError> for AppError {
    fn from(err: HolidayError) -> Self {
        AppError::new(3, err.to_string())
    }
}
