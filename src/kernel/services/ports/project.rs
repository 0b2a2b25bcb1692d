use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::HierarchyNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// The request never produced a readable reply.
    Network(String),
    /// The server answered with `success: false`.
    Rejected(String),
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::Network(e) => write!(f, "Network error: {}", e),
            ProjectError::Rejected(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for ProjectError {}

pub type Result<T> = std::result::Result<T, ProjectError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub name: String,
    pub data: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<HierarchyNode>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub message: String,
}

impl SaveResponse {
    pub fn into_result(self) -> Result<String> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ProjectError::Rejected(self.message))
        }
    }
}

impl LoadResponse {
    pub fn into_result(self) -> Result<Vec<HierarchyNode>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ProjectError::Rejected(self.message))
        }
    }
}

impl ListResponse {
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.success {
            Ok(self.projects)
        } else {
            Err(ProjectError::Rejected(self.message))
        }
    }
}

/// Remote store of saved projects.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn save(&self, request: SaveRequest) -> Result<String>;
    async fn load(&self, filename: &str) -> Result<Vec<HierarchyNode>>;
    async fn list(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/project.rs"]
mod tests;
