use std::fmt;

/// Configuration errors fail fast at recipe-construction time.
#[derive(Debug)]
pub enum ConfigError {
    NonPositiveSpacing,
    InvalidAngle,
    UnknownSortStrategy(String),
    NonPositiveStripeWidth,
    NonPositiveIslandWidth,
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::NonPositiveSpacing => write!(f, "hatch distance must be positive"),
            ConfigError::InvalidAngle => {
                write!(f, "hatch angle must lie in [-180, 180] degrees")
            }
            ConfigError::UnknownSortStrategy(name) => {
                write!(f, "unknown sort strategy: {name}")
            }
            ConfigError::NonPositiveStripeWidth => write!(f, "stripe width must be positive"),
            ConfigError::NonPositiveIslandWidth => write!(f, "island width must be positive"),
        }
    }
}

/// Raised by the exposure-point sampling utility when a build style's point
/// distance is too small to sample (< 1 micrometre).
#[derive(Debug)]
pub struct ExposureError {
    pub model_id: u32,
    pub build_id: u32,
}

impl std::error::Error for ExposureError {}

impl fmt::Display for ExposureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "point distance below 1um for build style (model_id={}, build_id={})",
            self.model_id, self.build_id
        )
    }
}
