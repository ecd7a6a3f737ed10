/// Process-boundary error: a message plus the exit code `main` should use.
///
/// Exit code conventions:
/// - 2: bad usage or bad input data (CSV/artifact problems, invalid flags)
/// - 3: estimation rejected (user-correctable inputs)
/// - 4: internal/terminal failures
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

    /// Bad input data or usage (exit code 2).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Internal failure (exit code 4).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(4, message)
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

impl From<crate::estimate::EstimateError> for AppError {
    fn from(err: crate::estimate::EstimateError) -> Self {
        AppError::new(3, err.to_string())
    }
}
