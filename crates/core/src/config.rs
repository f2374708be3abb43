use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `VANTA__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Redemption engine policy: tier thresholds, earning defaults, and the
/// ledger retry budget.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Cumulative spend at which a member becomes Silver.
    #[serde(default = "default_silver_threshold")]
    pub silver_threshold: f64,
    /// Cumulative spend at which a member becomes Gold.
    #[serde(default = "default_gold_threshold")]
    pub gold_threshold: f64,
    /// Charge applied when a perk carries no explicit discounted price
    /// (pure percentage or mileage offers).
    #[serde(default = "default_fallback_amount")]
    pub fallback_amount: f64,
    /// Earning rate for perks whose value string carries no digits.
    #[serde(default = "default_rate")]
    pub default_rate: f64,
    /// Wallet balance granted to a freshly provisioned profile.
    #[serde(default = "default_seed_balance")]
    pub seed_balance: f64,
    #[serde(default = "default_ledger_max_retries")]
    pub ledger_max_retries: u32,
    #[serde(default = "default_ledger_retry_base_ms")]
    pub ledger_retry_base_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_advisor_enabled")]
    pub enabled: bool,
    #[serde(default = "default_advisor_api_base")]
    pub api_base: String,
    /// Hosted model API key; the advisor runs disabled when empty.
    #[serde(default)]
    pub api_key: String,
    /// Model used for perk ranking and trend analysis.
    #[serde(default = "default_match_model")]
    pub match_model: String,
    /// Lighter model used for conversational replies.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Hard ceiling on every advisor call.
    #[serde(default = "default_advisor_timeout_ms")]
    pub timeout_ms: u64,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_silver_threshold() -> f64 {
    2000.0
}
fn default_gold_threshold() -> f64 {
    5000.0
}
fn default_fallback_amount() -> f64 {
    500.0
}
fn default_rate() -> f64 {
    0.05
}
fn default_seed_balance() -> f64 {
    100.0
}
fn default_ledger_max_retries() -> u32 {
    3
}
fn default_ledger_retry_base_ms() -> u64 {
    50
}
fn default_advisor_enabled() -> bool {
    true
}
fn default_advisor_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_match_model() -> String {
    "gemini-3-pro-preview".to_string()
}
fn default_chat_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_advisor_timeout_ms() -> u64 {
    8_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            silver_threshold: default_silver_threshold(),
            gold_threshold: default_gold_threshold(),
            fallback_amount: default_fallback_amount(),
            default_rate: default_rate(),
            seed_balance: default_seed_balance(),
            ledger_max_retries: default_ledger_max_retries(),
            ledger_retry_base_ms: default_ledger_retry_base_ms(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: default_advisor_enabled(),
            api_base: default_advisor_api_base(),
            api_key: String::new(),
            match_model: default_match_model(),
            chat_model: default_chat_model(),
            timeout_ms: default_advisor_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("VANTA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
