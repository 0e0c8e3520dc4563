use thiserror::Error;

/// Invalid run setup. Always fatal and always raised before the first
/// generation runs; there is no way to trip one of these mid-run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("population size must be greater than zero")]
    ZeroPopulation,

    #[error("mutation rate must lie in [0, 1), got {0}")]
    MutationRate(f64),

    #[error("pool size {pool_size} must be nonzero and smaller than population size {population_size}")]
    PoolSize {
        pool_size: usize,
        population_size: usize,
    },

    #[error("genome must contain at least one element")]
    EmptyGenome,

    #[error("max circle radius must be positive, got {0}")]
    CircleRadius(i32),

    #[error("unable to read parameter file {path}: {source}")]
    ParameterFile {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed parameter file: {0}")]
    ParameterParse(#[from] serde_yml::Error),
}

/// Top-level error type. Collaborator failures (target images that fail to
/// load or decode, artifacts that fail to save) are surfaced to the caller
/// as-is and never retried; everything inside the engine is deterministic
/// given its random source, so there is nothing transient to retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to load target image {path}: {source}")]
    TargetLoad {
        path: String,
        source: image::ImageError,
    },

    #[error("unable to save artifact to {path}: {source}")]
    ArtifactSave {
        path: String,
        source: image::ImageError,
    },
}
