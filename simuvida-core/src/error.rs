use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimuvidaError {
    #[error("Device '{0}' not found in the registry")]
    DeviceNotFound(String),

    #[error("No device class defined for kind '{0}'")]
    DeviceClassNotFound(String),

    #[error("An account with email '{0}' already exists")]
    AccountExists(String),

    #[error("No account registered for '{0}'")]
    AccountNotFound(String),

    #[error("Invalid credentials for '{0}'")]
    InvalidCredentials(String),

    #[error("Device model name must not be empty")]
    EmptyModelName,

    #[error("Manufacture year {0} is not a positive year")]
    InvalidYear(i32),

    #[error("A device profile must be provided for the session")]
    DeviceNotDefined,

    #[error("A device class must be provided for the session")]
    ClassNotDefined,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to serialize YAML for '{0}': {1}")]
    YamlWriting(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}
