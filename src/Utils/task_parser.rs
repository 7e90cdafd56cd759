//! Loading an `IntegrationRequest` from a TOML task file, so scenarios can
//! live next to the binary instead of being hardcoded. Expected shape:
//!
//! ```toml
//! [request]
//! function = "3*t + 2"
//! a = 0.0
//! b = 10.0
//! h = 0.1
//! demand = 500.0
//! ```

use crate::numerical::volume_solver::IntegrationRequest;
use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::Value;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to read task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("task file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("task file is missing the '{0}' key")]
    Missing(&'static str),
    #[error("task key '{0}' has the wrong type")]
    WrongType(&'static str),
}

pub fn load_task_file(path: impl AsRef<Path>) -> Result<IntegrationRequest, TaskError> {
    let content = fs::read_to_string(path)?;
    parse_task(&content)
}

pub fn parse_task(content: &str) -> Result<IntegrationRequest, TaskError> {
    let document: Value = content.parse()?;
    let request = document
        .get("request")
        .ok_or(TaskError::Missing("request"))?;

    let function = request
        .get("function")
        .ok_or(TaskError::Missing("function"))?
        .as_str()
        .ok_or(TaskError::WrongType("function"))?;

    Ok(IntegrationRequest::new(
        function,
        number(request, "a")?,
        number(request, "b")?,
        number(request, "h")?,
        number(request, "demand")?,
    ))
}

// TOML distinguishes 0 from 0.0, task authors should not have to
fn number(table: &Value, key: &'static str) -> Result<f64, TaskError> {
    let value = table.get(key).ok_or(TaskError::Missing(key))?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|n| n as f64))
        .ok_or(TaskError::WrongType(key))
}
