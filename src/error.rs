use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinvaultError {
    #[error("Invalid PIN: {0:?} is not a whole number.")]
    InvalidPin(String),

    #[error("Wrong PIN! Access denied.")]
    AccessDenied,

    #[error("No account named {0} found.")]
    NotFound(String),

    #[error("{0} cannot be empty.")]
    EmptyField(&'static str),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
