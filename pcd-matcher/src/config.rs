use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("search distance must be a non-negative number of meters, got {0}")]
    InvalidDistance(f64),
    #[error("search distance is not a number: {0:?}")]
    NotANumber(String),
}

/// Horizontal search radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MaxDistance(f64);

impl MaxDistance {
    pub const DEFAULT_METERS: f64 = 0.2;

    pub fn new(meters: f64) -> Result<Self, ConfigError> {
        if meters.is_finite() && meters >= 0.0 {
            Ok(Self(meters))
        } else {
            Err(ConfigError::InvalidDistance(meters))
        }
    }

    pub fn meters(self) -> f64 {
        self.0
    }
}

impl Default for MaxDistance {
    fn default() -> Self {
        Self(Self::DEFAULT_METERS)
    }
}

impl FromStr for MaxDistance {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let meters: f64 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber(s.to_string()))?;
        Self::new(meters)
    }
}

impl fmt::Display for MaxDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
