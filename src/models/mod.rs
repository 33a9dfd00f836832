//! Data models for the Idea Spark application.
//!
//! JSON field names are camelCase to match the frontend TypeScript interfaces.

mod generation;
mod idea;
mod setting;
mod stats;
mod technology;
mod theme;

pub use generation::*;
pub use idea::*;
pub use setting::*;
pub use stats::*;
pub use technology::*;
pub use theme::*;
