use hexguard_types::TypeName;

/// Fatal structural problems in the input symbol model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("duplicate qualified name '{name}'")]
    DuplicateType { name: TypeName },

    #[error("type descriptor with an empty qualified name")]
    EmptyName,

    /// A qualified reference into a package the model declares, naming a type the model lacks.
    #[error("'{from}' references '{reference}', which is not declared in package '{package}'")]
    DanglingReference {
        from: TypeName,
        reference: TypeName,
        package: String,
    },
}

/// A signal family could not interpret part of a descriptor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("malformed type reference '{raw}': {reason}")]
    MalformedTypeRef { raw: String, reason: String },
}

/// An audit rule failed to evaluate the snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("type '{name}' is classified but missing from the symbol model")]
    MissingDescriptor { name: TypeName },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Other(String),
}

/// Invalid policy configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("classification_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("unclassified_ratio_limit must be within [0, 1], got {0}")]
    RatioOutOfRange(f64),

    #[error("port_coverage_severity must be warning or critical, got {0}")]
    PortCoverageSeverity(String),
}

/// Failure to set up the analysis engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
