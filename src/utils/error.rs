use thiserror::Error;

#[derive(Error, Debug)]
pub enum FabricError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("SDK initialization failed: {message}")]
    InitializationError { message: String },

    #[error("User '{user}' not found in credential store")]
    UserNotFound { user: String },

    #[error("Failed to enroll user '{user}': {message}")]
    EnrollmentError { user: String, message: String },

    #[error("Gateway call '{operation}' failed with status {status}: {message}")]
    GatewayError {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Chaincode function '{fcn}' failed: {message}")]
    ChaincodeError { fcn: String, message: String },

    #[error("SDK handle is already closed")]
    SdkClosed,

    #[error("Step '{step}' skipped: {reason}")]
    StepSkipped { step: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Identity,
    Network,
    Chaincode,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FabricError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FabricError::ConfigError { .. }
            | FabricError::ConfigValidationError { .. }
            | FabricError::InvalidConfigValueError { .. }
            | FabricError::MissingConfigError { .. }
            | FabricError::InitializationError { .. } => ErrorCategory::Configuration,
            FabricError::UserNotFound { .. } | FabricError::EnrollmentError { .. } => {
                ErrorCategory::Identity
            }
            FabricError::HttpError(_) | FabricError::GatewayError { .. } => ErrorCategory::Network,
            FabricError::ChaincodeError { .. } => ErrorCategory::Chaincode,
            FabricError::IoError(_)
            | FabricError::SerializationError(_)
            | FabricError::SdkClosed
            | FabricError::StepSkipped { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FabricError::StepSkipped { .. } => ErrorSeverity::Low,
            FabricError::HttpError(_)
            | FabricError::GatewayError { .. }
            | FabricError::ChaincodeError { .. } => ErrorSeverity::Medium,
            FabricError::ConfigError { .. }
            | FabricError::ConfigValidationError { .. }
            | FabricError::InvalidConfigValueError { .. }
            | FabricError::MissingConfigError { .. }
            | FabricError::InitializationError { .. }
            | FabricError::UserNotFound { .. }
            | FabricError::EnrollmentError { .. } => ErrorSeverity::High,
            FabricError::IoError(_)
            | FabricError::SerializationError(_)
            | FabricError::SdkClosed => ErrorSeverity::Critical,
        }
    }

    /// 程序退出碼，與嚴重程度對應
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FabricError::InitializationError { .. } => {
                "Check that the connection profile exists and is valid TOML".to_string()
            }
            FabricError::ConfigError { .. }
            | FabricError::ConfigValidationError { .. }
            | FabricError::InvalidConfigValueError { .. } => {
                "Fix the connection profile or the command line arguments".to_string()
            }
            FabricError::MissingConfigError { field } => format!(
                "Provide '{}' on the command line, in the environment or in the profile [run] section",
                field
            ),
            FabricError::UserNotFound { .. } => {
                "Enroll the user first or check the credential store path".to_string()
            }
            FabricError::EnrollmentError { .. } => {
                "Verify the enrollment secret and that the user is registered with the CA"
                    .to_string()
            }
            FabricError::HttpError(_) | FabricError::GatewayError { .. } => {
                "Check that the gateway and CA endpoints are reachable".to_string()
            }
            FabricError::ChaincodeError { .. } => {
                "Check that the chaincode is installed and instantiated on the channel".to_string()
            }
            FabricError::IoError(_) => "Check file permissions and disk space".to_string(),
            FabricError::SerializationError(_) => {
                "The remote service returned an unexpected payload".to_string()
            }
            FabricError::SdkClosed => "Create a new SDK handle".to_string(),
            FabricError::StepSkipped { .. } => "Resolve the earlier failure and re-run".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FabricError::InitializationError { message } => {
                format!("Failed to create new SDK: {}", message)
            }
            FabricError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            FabricError::UserNotFound { user } => format!("User {} is not enrolled", user),
            FabricError::EnrollmentError { user, message } => {
                format!("Failed to enroll user {}: {}", user, message)
            }
            FabricError::GatewayError {
                operation, status, ..
            } => format!("{} failed (HTTP {})", operation, status),
            other => other.to_string(),
        }
    }

    pub fn is_user_not_found(&self) -> bool {
        matches!(self, FabricError::UserNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FabricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_error_exits_with_one() {
        let err = FabricError::InitializationError {
            message: "missing file".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("Failed to create new SDK"));
    }

    #[test]
    fn test_gateway_error_is_medium() {
        let err = FabricError::GatewayError {
            operation: "query_info".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_user_not_found_detection() {
        let err = FabricError::UserNotFound {
            user: "appUser".to_string(),
        };
        assert!(err.is_user_not_found());
        assert!(!FabricError::SdkClosed.is_user_not_found());
    }
}
