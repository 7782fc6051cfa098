//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Time range, seed, and runner limits.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Initial agent counts.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Recycler efficiency curve and owner recycling propensity.
    #[serde(default)]
    pub recycling: RecyclingConfig,
    /// Network influence growth.
    #[serde(default)]
    pub influence: InfluenceConfig,
    /// Battery material content and lifespan.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Fleet growth-rate schedule.
    #[serde(default)]
    pub growth: GrowthConfig,
}

/// Time range, seed, and runner limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// First simulated year.
    pub start_year: i32,
    /// Last simulated year (inclusive, must be >= `start_year`).
    pub end_year: i32,
    /// Hard cap on simulated years, guards against runaway configurations.
    pub max_steps: usize,
    /// Emit a progress log line every this many years (0 disables).
    pub progress_interval_years: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 2024,
            end_year: 2100,
            max_steps: 100,
            progress_interval_years: 5,
        }
    }
}

/// Initial agent counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Number of EV owners at the start year (must be > 0).
    pub initial_fleet_size: usize,
    /// Number of battery manufacturers (must be > 0).
    pub initial_manufacturer_count: usize,
    /// Number of recycling companies (must be > 0).
    pub initial_recycler_count: usize,
    /// Draw each initial owner's battery age uniformly from `0..=lifespan`
    /// instead of starting the whole fleet on new batteries.
    pub randomize_initial_battery_age: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_fleet_size: 1000,
            initial_manufacturer_count: 3,
            initial_recycler_count: 1,
            randomize_initial_battery_age: false,
        }
    }
}

/// Recycler efficiency curve and owner recycling propensity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecyclingConfig {
    /// Recoverable fraction of battery material in the start year (0.0–1.0).
    pub efficiency_start: f64,
    /// Annual geometric growth of efficiency (0.0–1.0).
    pub efficiency_growth: f64,
    /// Efficiency ceiling (0.0–1.0).
    pub max_efficiency: f64,
    /// Owner's recycle probability before network influence (0.0–1.0).
    pub base_recycling_probability: f64,
    /// Hard cap on the effective recycle probability (0.0–1.0).
    pub max_recycling_probability: f64,
}

impl Default for RecyclingConfig {
    fn default() -> Self {
        Self {
            efficiency_start: 0.6,
            efficiency_growth: 0.025,
            max_efficiency: 0.98,
            base_recycling_probability: 0.5,
            max_recycling_probability: 0.95,
        }
    }
}

/// Network influence growth.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfluenceConfig {
    /// Influence added to every owner each year.
    pub annual_increase: f64,
    /// Influence ceiling.
    pub max_influence: f64,
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            annual_increase: 0.01,
            max_influence: 0.5,
        }
    }
}

/// Battery material content and lifespan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Lithium content per battery (kg, > 0).
    pub lithium_kg: f64,
    /// Cobalt content per battery (kg, > 0).
    pub cobalt_kg: f64,
    /// Years until a battery reaches end of life (must be > 0).
    pub lifespan_years: u32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            lithium_kg: 2.5,
            cobalt_kg: 6.0,
            lifespan_years: 8,
        }
    }
}

/// One band of the fleet growth-rate schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrowthBand {
    /// Last year covered by this band (inclusive). `None` marks the
    /// open-ended final band.
    #[serde(default)]
    pub last_year: Option<i32>,
    /// Annual fleet growth fraction within the band (>= 0).
    pub rate: f64,
}

/// Fleet growth-rate schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthConfig {
    /// Closed bands in ascending `last_year` order, then one open band.
    pub bands: Vec<GrowthBand>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                GrowthBand {
                    last_year: Some(2030),
                    rate: 0.10,
                },
                GrowthBand {
                    last_year: Some(2035),
                    rate: 0.15,
                },
                GrowthBand {
                    last_year: None,
                    rate: 0.075,
                },
            ],
        }
    }
}

impl GrowthConfig {
    /// Growth rate for `year`: the first band whose `last_year` covers it,
    /// otherwise the open-ended band.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_recycling_sim::config::GrowthConfig;
    ///
    /// let growth = GrowthConfig::default();
    /// assert_eq!(growth.rate_for(2030), 0.10);
    /// assert_eq!(growth.rate_for(2031), 0.15);
    /// assert_eq!(growth.rate_for(2090), 0.075);
    /// ```
    pub fn rate_for(&self, year: i32) -> f64 {
        self.bands
            .iter()
            .find(|b| b.last_year.is_none_or(|last| year <= last))
            .map_or(0.0, |b| b.rate)
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scenario file could not be read.
    #[error("config error: cannot read \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML was malformed or contained unknown fields.
    #[error("config error: {0}")]
    Parse(#[from] toml::de::Error),
    /// No preset with the given name.
    #[error("config error: unknown preset \"{name}\", available: {}", ScenarioConfig::PRESETS.join(", "))]
    UnknownPreset { name: String },
    /// A field violates its constraint.
    #[error("config error: {field} - {message}")]
    Invalid {
        /// Dotted field path (e.g., `"simulation.end_year"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Field path for `Invalid` errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the no-recycling counterfactual: nothing is ever recovered.
    pub fn no_recycling() -> Self {
        Self {
            recycling: RecyclingConfig {
                efficiency_start: 0.0,
                efficiency_growth: 0.0,
                base_recycling_probability: 0.0,
                ..RecyclingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the high-efficiency preset: better recyclers, keener owners.
    pub fn high_efficiency() -> Self {
        Self {
            recycling: RecyclingConfig {
                efficiency_start: 0.8,
                efficiency_growth: 0.04,
                base_recycling_probability: 0.8,
                ..RecyclingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "no_recycling", "high_efficiency"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownPreset` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "no_recycling" => Ok(Self::no_recycling()),
            "high_efficiency" => Ok(Self::high_efficiency()),
            _ => Err(ConfigError::UnknownPreset {
                name: name.to_string(),
            }),
        }
    }

    /// Returns this scenario with its `recycling` section replaced by the
    /// named preset's. Time range, seed, population, battery and growth
    /// settings are kept, so both runs stay comparable year for year.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownPreset` if the preset name is unknown.
    pub fn with_preset_recycling(&self, name: &str) -> Result<Self, ConfigError> {
        let preset = Self::from_preset(name)?;
        Ok(Self {
            recycling: preset.recycling,
            ..self.clone()
        })
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.end_year < s.start_year {
            errors.push(ConfigError::invalid(
                "simulation.end_year",
                format!("must be >= simulation.start_year ({})", s.start_year),
            ));
        }
        if s.max_steps == 0 {
            errors.push(ConfigError::invalid("simulation.max_steps", "must be > 0"));
        }

        let p = &self.population;
        if p.initial_fleet_size == 0 {
            errors.push(ConfigError::invalid(
                "population.initial_fleet_size",
                "must be > 0",
            ));
        }
        if p.initial_manufacturer_count == 0 {
            errors.push(ConfigError::invalid(
                "population.initial_manufacturer_count",
                "must be > 0",
            ));
        }
        if p.initial_recycler_count == 0 {
            errors.push(ConfigError::invalid(
                "population.initial_recycler_count",
                "must be > 0",
            ));
        }

        let r = &self.recycling;
        for (field, value) in [
            ("recycling.efficiency_start", r.efficiency_start),
            ("recycling.efficiency_growth", r.efficiency_growth),
            ("recycling.max_efficiency", r.max_efficiency),
            (
                "recycling.base_recycling_probability",
                r.base_recycling_probability,
            ),
            (
                "recycling.max_recycling_probability",
                r.max_recycling_probability,
            ),
        ] {
            check_fraction(&mut errors, field, value);
        }
        if r.efficiency_start > r.max_efficiency {
            errors.push(ConfigError::invalid(
                "recycling.efficiency_start",
                "must be <= recycling.max_efficiency",
            ));
        }

        let i = &self.influence;
        check_fraction(&mut errors, "influence.annual_increase", i.annual_increase);
        check_fraction(&mut errors, "influence.max_influence", i.max_influence);

        let b = &self.battery;
        if !(b.lithium_kg.is_finite() && b.lithium_kg > 0.0) {
            errors.push(ConfigError::invalid("battery.lithium_kg", "must be > 0"));
        }
        if !(b.cobalt_kg.is_finite() && b.cobalt_kg > 0.0) {
            errors.push(ConfigError::invalid("battery.cobalt_kg", "must be > 0"));
        }
        if b.lifespan_years == 0 {
            errors.push(ConfigError::invalid("battery.lifespan_years", "must be > 0"));
        }

        self.validate_growth(&mut errors);

        errors
    }

    fn validate_growth(&self, errors: &mut Vec<ConfigError>) {
        let bands = &self.growth.bands;
        let Some((last, closed)) = bands.split_last() else {
            errors.push(ConfigError::invalid("growth.bands", "must not be empty"));
            return;
        };
        if last.last_year.is_some() {
            errors.push(ConfigError::invalid(
                "growth.bands",
                "final band must omit last_year",
            ));
        }
        if closed.iter().any(|b| b.last_year.is_none()) {
            errors.push(ConfigError::invalid(
                "growth.bands",
                "only the final band may omit last_year",
            ));
        }
        if closed
            .windows(2)
            .any(|w| matches!((w[0].last_year, w[1].last_year), (Some(a), Some(b)) if a >= b))
        {
            errors.push(ConfigError::invalid(
                "growth.bands",
                "last_year must be strictly ascending",
            ));
        }
        if bands.iter().any(|b| !(b.rate.is_finite() && b.rate >= 0.0)) {
            errors.push(ConfigError::invalid("growth.bands", "rate must be >= 0"));
        }
    }
}

fn check_fraction(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::invalid(field, "must be in [0.0, 1.0]"));
    }
}
