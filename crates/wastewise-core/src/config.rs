use crate::ecopoints::DEFAULT_POINTS_PER_KG;
use crate::error::{Result, WasteError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_port() -> u16 {
    3141
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

// ---------------------------------------------------------------------------
// NudgeConfig / CalculationConfig / EcoPointsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NudgeConfig {
    /// How many days of logs the nudge rules look at.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_window_days() -> u32 {
    30
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    10
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcoPointsConfig {
    #[serde(default = "default_points_per_kg")]
    pub points_per_kg: f64,
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
}

fn default_points_per_kg() -> f64 {
    DEFAULT_POINTS_PER_KG
}

fn default_recent_activity_limit() -> usize {
    5
}

impl Default for EcoPointsConfig {
    fn default() -> Self {
        Self {
            points_per_kg: default_points_per_kg(),
            recent_activity_limit: default_recent_activity_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// CoachBackendConfig / CoachConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoachBackendConfig {
    /// Offline, rule-based replies.
    Canned,
    Gemini {
        #[serde(default = "default_gemini_model")]
        model: String,
        /// Name of the environment variable holding the API key.
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_base_url")]
        base_url: String,
    },
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_GENERATIVE_AI_API_KEY".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default = "default_coach_backend")]
    pub backend: CoachBackendConfig,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Number of most recent logs summarised into the coach prompt.
    #[serde(default = "default_context_logs")]
    pub context_logs: usize,
}

fn default_coach_backend() -> CoachBackendConfig {
    CoachBackendConfig::Canned
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_context_logs() -> usize {
    7
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            backend: default_coach_backend(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_logs: default_context_logs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nudges: NudgeConfig,
    #[serde(default)]
    pub calculations: CalculationConfig,
    #[serde(default)]
    pub ecopoints: EcoPointsConfig,
    #[serde(default)]
    pub coach: CoachConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            nudges: NudgeConfig::default(),
            calculations: CalculationConfig::default(),
            ecopoints: EcoPointsConfig::default(),
            coach: CoachConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(WasteError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.nudges.window_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "nudges.window_days must be at least 1".to_string(),
            });
        }

        if self.calculations.history_limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "calculations.history_limit is 0: history will always be empty"
                    .to_string(),
            });
        }

        if !self.ecopoints.points_per_kg.is_finite() || self.ecopoints.points_per_kg < 0.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "ecopoints.points_per_kg must be a non-negative number, got {}",
                    self.ecopoints.points_per_kg
                ),
            });
        }

        if !(0.0..=2.0).contains(&self.coach.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "coach.temperature {} is outside the usual 0.0-2.0 range",
                    self.coach.temperature
                ),
            });
        }

        if self.coach.max_tokens == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "coach.max_tokens must be at least 1".to_string(),
            });
        }

        if let CoachBackendConfig::Gemini { api_key_env, .. } = &self.coach.backend {
            if std::env::var(api_key_env).map(|v| v.is_empty()).unwrap_or(true) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "coach backend is gemini but ${api_key_env} is not set; coach requests will fail"
                    ),
                });
            }
        }

        warnings
    }
}
