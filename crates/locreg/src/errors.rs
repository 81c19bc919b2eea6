use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Target window lost focus: {0}")]
    FocusLost(String),

    #[error("Actuator fault: {0}")]
    ActuatorFault(String),

    #[error("Cancelled by operator")]
    Cancelled,
}
