//! Tools available to responders

pub mod calculator;

pub use calculator::{precompute, Calculation, Calculator, Precomputed, CALCULATOR_TOOL};

/// Tool identifier recorded when a responder searches the syllabus
pub const SYLLABUS_SEARCH_TOOL: &str = "syllabus_search";
