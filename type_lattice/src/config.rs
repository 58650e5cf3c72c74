//! Resolver configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! max_passes = 50
//! check_acceptability = true
//! cache_comparisons = false
//! mode = "greatest"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Pass limit for the fixed-point loop. Variables still changing after this
/// many passes are reported as non-convergent.
pub const MAX_RESOLUTION_PASSES: usize = 100;

/// Which extreme solution the solver looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    /// Most specific types: start at `unknown`, raise with lub.
    #[default]
    Least,
    /// Most general types: start at `general`, lower with glb.
    Greatest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_passes: usize,
    /// Report settable variables that resolve to an abstract type.
    pub check_acceptability: bool,
    pub cache_comparisons: bool,
    pub mode: SolveMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_passes: MAX_RESOLUTION_PASSES,
            check_acceptability: true,
            cache_comparisons: true,
            mode: SolveMode::Least,
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(source: &str) -> TypeResult<Self> {
        let config: ResolverConfig =
            toml::from_str(source).map_err(|e| TypeError::Config(e.to_string()))?;
        if config.max_passes == 0 {
            return Err(TypeError::Config("max_passes must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn with_mode(mut self, mode: SolveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}
