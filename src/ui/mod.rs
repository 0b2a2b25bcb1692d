//! Headless UI layer: editor widgets, the box scene and its hit regions.
//!
//! Nothing here depends on `ratatui`; the frontend under `app` draws what the
//! scene lays out.

pub mod editor;
pub mod geom;
pub mod scene;

pub use geom::{Pos, Rect};
