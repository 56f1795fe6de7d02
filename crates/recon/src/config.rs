use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Run label carried into `RunMeta`.
    pub name: String,
    pub key: KeyConfig,
    /// Base fields rounded to the nearest whole unit before comparison.
    /// Caller-supplied; the engine never infers which fields are numeric.
    #[serde(default)]
    pub rounded_fields: Vec<String>,
    /// Propagate per-field coercion failures instead of recovering them.
    #[serde(default)]
    pub strict: bool,
    /// Whether rows whose key exists on one side only count toward summary
    /// denominators. Defaults to true so per-field totals equal the row count.
    #[serde(default = "default_true")]
    pub count_unjoined_rows: bool,
    pub input: SourceConfig,
    pub output: SourceConfig,
    /// Where the Writer persists the three result tables (.xlsx workbook or
    /// .csv basename). Optional; library callers may ignore it.
    #[serde(default)]
    pub report: Option<String>,
}

/// Literal key column name on each side. The two names may differ; they
/// designate the same conceptual field.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    /// Sheet name for Excel sources; loaders default to the first sheet.
    #[serde(default)]
    pub sheet: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconcileConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconcileConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.key.input.is_empty() || self.key.output.is_empty() {
            return Err(ReconError::ConfigValidation(
                "key columns must not be empty".into(),
            ));
        }
        for (i, field) in self.rounded_fields.iter().enumerate() {
            if self.rounded_fields[..i].contains(field) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate rounded field '{field}'"
                )));
            }
        }
        Ok(())
    }

    /// Whether `base` gets whole-unit rounding before comparison.
    pub fn is_rounded(&self, base: &str) -> bool {
        self.rounded_fields.iter().any(|f| f == base)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
