use crate::error::{SifError, SifResult};
use crate::models::ec::{EcMethod, ASYMPTOTIC_REFINEMENTS, EXACT_THRESHOLD, MIN_EXACT_THRESHOLD};
use crate::models::sst::{GreekMethod, SifEvaluator};
use crate::params::SifParams;

/// L-BFGS-B settings for fitting the paper form
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct FitConfig {
    /// Max iterations for L-BFGS-B
    #[cfg_attr(feature = "serde", serde(default = "default_fit_iterations"))]
    pub max_iterations: usize,
    /// Convergence tolerance
    #[cfg_attr(feature = "serde", serde(default = "default_fit_tolerance"))]
    pub tolerance: f64,
    /// Box applied to both `a` and `b`
    #[cfg_attr(feature = "serde", serde(default = "default_fit_bounds"))]
    pub bounds: (f64, f64),
    /// Starting point `(a, b)`
    #[cfg_attr(feature = "serde", serde(default = "default_initial_guess"))]
    pub initial_guess: (f64, f64),
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_fit_iterations(),
            tolerance: default_fit_tolerance(),
            bounds: default_fit_bounds(),
            initial_guess: default_initial_guess(),
        }
    }
}

/// Grid scan + Brent settings for zero-crossing searches
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CrossingConfig {
    /// Uniform samples used to bracket sign changes
    #[cfg_attr(feature = "serde", serde(default = "default_crossing_samples"))]
    pub samples: usize,
    /// Brent convergence tolerance on δ
    #[cfg_attr(feature = "serde", serde(default = "default_crossing_tolerance"))]
    pub tolerance: f64,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            samples: default_crossing_samples(),
            tolerance: default_crossing_tolerance(),
        }
    }
}

/// Main configuration for evaluation and analysis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SifConfig {
    /// Displacement at which EC switches to the asymptotic branch
    #[cfg_attr(feature = "serde", serde(default = "default_exact_threshold"))]
    pub exact_threshold: f64,
    /// Refinement steps of the asymptotic branch (0 = leading term only)
    #[cfg_attr(feature = "serde", serde(default = "default_asymptotic_refinements"))]
    pub asymptotic_refinements: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ec_method: EcMethod,
    #[cfg_attr(feature = "serde", serde(default))]
    pub greek_method: GreekMethod,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fit: FitConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crossing: CrossingConfig,
}

impl Default for SifConfig {
    fn default() -> Self {
        Self {
            exact_threshold: default_exact_threshold(),
            asymptotic_refinements: default_asymptotic_refinements(),
            ec_method: EcMethod::Hybrid,
            greek_method: GreekMethod::Analytic,
            fit: FitConfig::default(),
            crossing: CrossingConfig::default(),
        }
    }
}

impl SifConfig {
    /// Settings used to regenerate the whitepaper figures
    pub fn paper() -> Self {
        Self::default()
    }

    /// Tighter fitting and denser crossing scans for research use
    pub fn precise() -> Self {
        Self {
            fit: FitConfig {
                max_iterations: 1000,
                tolerance: 1e-12,
                ..FitConfig::default()
            },
            crossing: CrossingConfig {
                samples: 20_000,
                tolerance: 1e-14,
            },
            ..Self::default()
        }
    }

    /// Coarse settings for quick checks and unit tests
    pub fn fast() -> Self {
        Self {
            fit: FitConfig {
                max_iterations: 50,
                tolerance: 1e-8,
                ..FitConfig::default()
            },
            crossing: CrossingConfig {
                samples: 200,
                tolerance: 1e-9,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SifResult<()> {
        if !self.exact_threshold.is_finite() || self.exact_threshold < MIN_EXACT_THRESHOLD {
            return Err(SifError::InvalidThreshold(self.exact_threshold));
        }
        self.greek_method.validate()?;
        Ok(())
    }

    /// Build an evaluator for `params` honouring the EC and Greek settings.
    pub fn evaluator(&self, params: SifParams) -> SifResult<SifEvaluator> {
        self.validate()?;
        SifEvaluator::new(
            params,
            self.ec_method
                .model(self.exact_threshold, self.asymptotic_refinements),
            self.greek_method,
        )
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: SifConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&text)
    }
}

// Default value functions
fn default_exact_threshold() -> f64 {
    EXACT_THRESHOLD
}

fn default_asymptotic_refinements() -> usize {
    ASYMPTOTIC_REFINEMENTS
}

fn default_fit_iterations() -> usize {
    200
}

fn default_fit_tolerance() -> f64 {
    1e-10
}

fn default_fit_bounds() -> (f64, f64) {
    (1e-6, 10.0)
}

fn default_initial_guess() -> (f64, f64) {
    (0.8, 1.2)
}

fn default_crossing_samples() -> usize {
    2000
}

fn default_crossing_tolerance() -> f64 {
    1e-12
}
