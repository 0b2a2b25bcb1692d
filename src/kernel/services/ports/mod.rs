//! Service ports: traits + data contracts.

pub mod project;
pub mod settings;

pub use project::{
    ListResponse, LoadRequest, LoadResponse, ProjectApi, ProjectError, Result as ProjectResult,
    SaveRequest, SaveResponse,
};
pub use settings::{Settings, ThemeSettings};
