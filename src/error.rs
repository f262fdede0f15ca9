use std::fmt;

/// Failure modes of the forecasting core.
///
/// Insufficient trend history is deliberately *not* represented here: the
/// trend forecaster treats it as a defined degenerate input and returns an
/// empty result instead of failing (see `fit::trend`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    /// The normal-equation matrix `XᵀX` is not invertible for the requested
    /// polynomial degree. Recoverable: lower the degree or supply more
    /// observations.
    SingularMatrix { degree: usize, n_points: usize },
    /// The fit request itself is malformed (e.g. an empty input series).
    InvalidConfiguration(String),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::SingularMatrix { degree, n_points } => write!(
                f,
                "Normal-equation matrix is singular for degree {degree} with {n_points} data point(s); \
                 reduce the degree or supply more data."
            ),
            FitError::InvalidConfiguration(msg) => write!(f, "Invalid fit configuration: {msg}"),
        }
    }
}

impl std::error::Error for FitError {}

/// Application-level error carrying the process exit code.
///
/// Exit code convention:
/// - 2: input/configuration problems (bad CSV, bad flags)
/// - 3: the data cannot support the requested fit
/// - 4: runtime failures (network, terminal, filesystem)
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

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::SingularMatrix { .. } => 3,
            FitError::InvalidConfiguration(_) => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_matrix_maps_to_exit_code_3() {
        let err = FitError::SingularMatrix {
            degree: 5,
            n_points: 2,
        };
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.to_string().contains("reduce the degree"));
    }

    #[test]
    fn invalid_configuration_maps_to_exit_code_2() {
        let err = FitError::InvalidConfiguration("empty series".to_string());
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 2);
    }
}
