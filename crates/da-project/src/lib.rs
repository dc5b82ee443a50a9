//! da-project: machine description files and their compilation.
//!
//! A description lists shafts by grid span and components by type, wired to
//! shafts by numeric id. Loading validates the description; [`compile`]
//! additionally resolves expressions and builds a [`da_sim::Simulator`].

pub mod compile;
pub mod schema;
pub mod validate;
pub mod variables;

pub use compile::{compile, CompileOptions, DEFAULT_MOTOR_ROTATION};
pub use schema::*;
pub use validate::{validate_config, ValidationError};
pub use variables::resolve_custom_variables;

use std::path::Path;

use da_expr::ExprError;
use da_graph::GraphError;
use da_sim::SimError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Expression error in {component}: {source}")]
    Expression {
        component: String,
        #[source]
        source: ExprError,
    },

    #[error("Custom variables: {0}")]
    Variables(#[source] ExprError),

    #[error("Topology error: {0}")]
    Topology(#[from] GraphError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_json_str(content: &str) -> ProjectResult<Config> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Config> {
    let config: Config = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_json(path: &Path) -> ProjectResult<Config> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Config> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

/// Load by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn load(path: &Path) -> ProjectResult<Config> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        _ => load_json(path),
    }
}

pub fn save_json(path: &Path, config: &Config) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_yaml(path: &Path, config: &Config) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
