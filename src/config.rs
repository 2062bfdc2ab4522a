use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub settlement: SettlementSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub log_level: String,
    pub log_format: String,
    /// Replace amounts with their magnitude bucket in log output.
    pub mask_amounts: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementSettings {
    /// JSON debt graph to settle when no path is given on the command line.
    pub input_path: Option<String>,
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Settings {
    /// Loads settings from built-in defaults, `config/default`, an optional
    /// `config/local` and `APP__`-prefixed environment variables, in that order.
    pub fn new() -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn builder() -> std::result::Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("application.log_level", "info")?
            .set_default("application.log_format", "pretty")?
            .set_default("application.mask_amounts", false)?
            .set_default("settlement.output_format", "text")
    }
}
