use crate::config::SmokeConfig;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub cfg: SmokeConfig,
    pub verbosity: u8,
}

impl AppContext {
    #[must_use]
    pub const fn new(cfg: SmokeConfig, verbosity: u8) -> Self {
        Self { cfg, verbosity }
    }

    /// Convenience constructor loading config from the environment and
    /// applying the CLI runtime override.
    #[must_use]
    pub fn from_cli(verbosity: u8, runtime_override: Option<&str>) -> Self {
        let mut cfg = SmokeConfig::load();
        if let Some(program) = runtime_override {
            cfg.runtime_program = program.to_string();
        }
        Self::new(cfg, verbosity)
    }
}
