//! Early-childhood developmental screening service library.
//!
//! The `workflows` tree holds the assessment core (age calendar, bracket
//! schedule, scoring engine, service facade, HTTP router) and the milestone
//! item bank importer. Configuration, telemetry, and the application error
//! aggregate live at the crate root.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
