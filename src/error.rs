use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `MuseCoach`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum CoachError {
    // ── Catalog ─────────────────────────────────────────────────────────
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    // ── Safety rules ────────────────────────────────────────────────────
    #[error("rule: {0}")]
    Rule(#[from] RuleError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Catalog errors ──────────────────────────────────────────────────────────

/// Registration-time validation failures. Invalid definitions never enter
/// the active catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("skill name must not be empty")]
    EmptyName,

    #[error("skill {name} declares no triggers")]
    NoTriggers { name: String },

    #[error("skill {name} has an empty minimal action")]
    EmptyAction { name: String },

    #[error("skill {name} has an empty {variant} message variant")]
    EmptyMessage { name: String, variant: String },
}

// ─── Safety rule errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule} has an invalid regex pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule {rule} declares no trigger patterns")]
    NoPatterns { rule: String },

    #[error("rule {rule} has an empty response template")]
    EmptyResponse { rule: String },
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("validation failed: {0}")]
    Validation(String),
}
