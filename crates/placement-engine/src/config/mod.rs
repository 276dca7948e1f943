use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub placement: PlacementConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = PlacementConfig::default();
        let dream_threshold = match env::var("PLACEMENT_DREAM_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDreamThreshold)?,
            Err(_) => defaults.dream_threshold,
        };
        let max_offers = match env::var("PLACEMENT_MAX_OFFERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidMaxOffers)?,
            Err(_) => defaults.max_offers,
        };
        let default_eligible_years = match env::var("PLACEMENT_DEFAULT_YEARS") {
            Ok(raw) => parse_years(&raw)?,
            Err(_) => defaults.default_eligible_years,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            placement: PlacementConfig {
                dream_threshold,
                max_offers,
                default_eligible_years,
            },
        })
    }
}

fn parse_years(raw: &str) -> Result<Vec<u8>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<u8>().map_err(|_| ConfigError::InvalidEligibleYears {
                value: value.to_string(),
            })
        })
        .collect()
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Placement-cell policy dials shared by drive creation and offer acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Package (in rupees) at or above which a drive counts as a dream offer.
    pub dream_threshold: u64,
    /// Global cap on accepted offers per student, regardless of offer type.
    pub max_offers: usize,
    /// Years applied to drives created without an explicit year filter.
    pub default_eligible_years: Vec<u8>,
}

pub const DEFAULT_DREAM_THRESHOLD: u64 = 1_000_000;
pub const DEFAULT_MAX_OFFERS: usize = 2;

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            dream_threshold: DEFAULT_DREAM_THRESHOLD,
            max_offers: DEFAULT_MAX_OFFERS,
            default_eligible_years: vec![3, 4],
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDreamThreshold,
    InvalidMaxOffers,
    InvalidEligibleYears { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDreamThreshold => {
                write!(f, "PLACEMENT_DREAM_THRESHOLD must be a non-negative integer")
            }
            ConfigError::InvalidMaxOffers => {
                write!(f, "PLACEMENT_MAX_OFFERS must be a non-negative integer")
            }
            ConfigError::InvalidEligibleYears { value } => write!(
                f,
                "PLACEMENT_DEFAULT_YEARS must be a comma separated list of years (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
