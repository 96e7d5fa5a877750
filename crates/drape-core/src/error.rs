use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{axis} ratio {value} is outside (0, 1]")]
    RatioOutOfRange { axis: &'static str, value: f32 },
    #[error("{what} must be finite and positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
