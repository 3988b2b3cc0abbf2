use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("identity mapping error: {0}")]
    Mapping(String),

    #[error("authentication failed for {system}: {reason}")]
    Auth { system: String, reason: String },
}

pub type MigrateResult<T> = Result<T, MigrateError>;
