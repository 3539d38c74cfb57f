//! Configuration system for the coursetable scheduler.
//!
//! Load solver configuration from TOML or YAML to tune the tabu repair,
//! the annealing schedule and the penalty weights without code changes.
//!
//! # Examples
//!
//! ```
//! use coursetable_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [tabu_search.termination]
//!     seconds_spent_limit = 30
//!
//!     [simulated_annealing]
//!     t_max = 8.0
//!     t_min = 1.0
//! "#).unwrap();
//!
//! assert_eq!(config.tabu_search.termination.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.simulated_annealing.t_max, 8.0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use coursetable_config::SolverConfig;
//!
//! let config = SolverConfig::load("coursetable.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use coursetable_core::{Horizon, InputRules, PenaltyWeights};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Solve independent sub-problems of one recurrence level on the rayon pool.
    #[serde(default)]
    pub parallel_subproblems: bool,

    /// Shape of the week.
    #[serde(default)]
    pub horizon: HorizonConfig,

    /// Wall-clock limit for a whole solve, checked by every phase.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    #[serde(default)]
    pub construction: ConstructionConfig,

    #[serde(default)]
    pub tabu_search: TabuSearchConfig,

    #[serde(default)]
    pub simulated_annealing: SimulatedAnnealingConfig,

    #[serde(default)]
    pub penalties: PenaltyConfig,

    #[serde(default)]
    pub input: InputConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_parallel_subproblems(mut self, parallel: bool) -> Self {
        self.parallel_subproblems = parallel;
        self
    }

    /// Sets the overall time limit of a solve.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the time limit of each tabu repair phase.
    pub fn with_tabu_seconds(mut self, seconds: u64) -> Self {
        self.tabu_search.termination = TerminationConfig::seconds(seconds);
        self
    }

    /// Sets the time limit of each annealing phase.
    pub fn with_annealing_seconds(mut self, seconds: u64) -> Self {
        self.simulated_annealing.termination = TerminationConfig::seconds(seconds);
        self
    }

    /// Returns the overall time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    pub fn penalty_weights(&self) -> PenaltyWeights {
        PenaltyWeights::from(&self.penalties)
    }

    pub fn input_rules(&self) -> InputRules {
        InputRules::from(&self.input)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        self.horizon.to_horizon()?;

        let tabu = &self.tabu_search;
        if tabu.position_tabu_size == 0 || tabu.split_tabu_size == 0 || tabu.unplaced_swap_tabu_size == 0 {
            return invalid("tabu list sizes must be positive");
        }
        if tabu.position_swap_weight + tabu.unplaced_swap_weight + tabu.split_weight == 0 {
            return invalid("at least one tabu move weight must be positive");
        }

        let sa = &self.simulated_annealing;
        if !(sa.t_min > 0.0 && sa.t_max > sa.t_min) {
            return invalid("annealing temperatures must satisfy 0 < t_min < t_max");
        }
        if sa.steps == 0 {
            return invalid("annealing steps must be positive");
        }
        if sa.max_swap_attempts == 0 {
            return invalid("max_swap_attempts must be positive");
        }

        let ratio = self.input.scheduled_hours_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return invalid("scheduled_hours_ratio must lie in (0, 1]");
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Grid invariants checked at the end of every phase.
    FastAssert,

    /// Grid invariants checked after every step.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    pub fn is_fully_asserted(self) -> bool {
        self == EnvironmentMode::FullAssert
    }
}

/// Shape of the week.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HorizonConfig {
    pub days_per_week: u32,
    pub hours_per_day: u32,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        let horizon = Horizon::default();
        Self {
            days_per_week: horizon.days_per_week(),
            hours_per_day: horizon.hours_per_day(),
        }
    }
}

impl HorizonConfig {
    pub fn to_horizon(&self) -> Result<Horizon, ConfigError> {
        if self.days_per_week > 7 {
            return Err(ConfigError::Invalid("days_per_week must be at most 7".into()));
        }
        Horizon::new(self.days_per_week, self.hours_per_day).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,
}

impl TerminationConfig {
    pub fn seconds(seconds: u64) -> Self {
        Self {
            seconds_spent_limit: Some(seconds),
            ..Self::default()
        }
    }

    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds = self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConstructionConfig {
    pub room_ranking: RoomRanking,
}

/// How the constructive builder picks among feasible positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomRanking {
    /// Fewest away curricula first, then the tightest room.
    #[default]
    HomeThenTightest,

    /// First feasible position in (room, slot) order.
    FirstFit,
}

/// Tabu repair configuration.
///
/// Each step draws one of three moves with probability proportional to
/// its weight.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TabuSearchConfig {
    /// Entries in the position-pair tabu list (each move adds two).
    pub position_tabu_size: usize,
    /// Entries in the split tabu list.
    pub split_tabu_size: usize,
    /// Entries in the time slot tabu list.
    pub unplaced_swap_tabu_size: usize,
    pub position_swap_weight: u32,
    pub unplaced_swap_weight: u32,
    pub split_weight: u32,
    pub termination: TerminationConfig,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self {
            position_tabu_size: 300,
            split_tabu_size: 20,
            unplaced_swap_tabu_size: 20,
            position_swap_weight: 16,
            unplaced_swap_weight: 50,
            split_weight: 34,
            termination: TerminationConfig::seconds(120),
        }
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Starting temperature.
    pub t_max: f64,
    /// Temperature floor.
    pub t_min: f64,
    /// Steps of one cooling cycle.
    pub steps: u32,
    /// Consecutive rejections before the schedule restarts.
    pub reheat_after: u32,
    /// Swap draws per step before the phase gives up.
    pub max_swap_attempts: u32,
    pub termination: TerminationConfig,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            t_max: 5.0,
            t_min: 1.3,
            steps: 5,
            reheat_after: 10,
            max_swap_attempts: 1000,
            termination: TerminationConfig::seconds(60),
        }
    }
}

/// Soft penalty weights.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PenaltyConfig {
    pub late_hour_penalty: f64,
    pub kilometer_penalty: f64,
    pub not_home_penalty: f64,
    pub include_room_size: bool,
    pub include_not_home: bool,
    pub include_distance: bool,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        let weights = PenaltyWeights::default();
        Self {
            late_hour_penalty: weights.late_hour,
            kilometer_penalty: weights.kilometer,
            not_home_penalty: weights.not_home,
            include_room_size: weights.include_room_size,
            include_not_home: weights.include_not_home,
            include_distance: weights.include_distance,
        }
    }
}

impl From<&PenaltyConfig> for PenaltyWeights {
    fn from(config: &PenaltyConfig) -> Self {
        PenaltyWeights {
            late_hour: config.late_hour_penalty,
            kilometer: config.kilometer_penalty,
            not_home: config.not_home_penalty,
            include_room_size: config.include_room_size,
            include_not_home: config.include_not_home,
            include_distance: config.include_distance,
        }
    }
}

/// Dataset preprocessing rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InputConfig {
    pub min_student_amount: u32,
    pub max_contact_hours: u32,
    pub scheduled_hours_ratio: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        let rules = InputRules::default();
        Self {
            min_student_amount: rules.min_student_amount,
            max_contact_hours: rules.max_contact_hours,
            scheduled_hours_ratio: rules.scheduled_hours_ratio,
        }
    }
}

impl From<&InputConfig> for InputRules {
    fn from(config: &InputConfig) -> Self {
        InputRules {
            min_student_amount: config.min_student_amount,
            max_contact_hours: config.max_contact_hours,
            scheduled_hours_ratio: config.scheduled_hours_ratio,
        }
    }
}
