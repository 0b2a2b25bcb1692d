pub mod theme;
mod workbench;

pub use workbench::{EventResult, Workbench, WorkbenchConfig};
