// Photo Critic - Library Entry Point
// Heuristic photo scoring over pluggable detection backends

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod scoring;
pub mod tools;

pub use analyzer::{PhotoAnalyzer, Strategy};
pub use config::AnalyzerConfig;
pub use detection::{DetectionBackend, DetectionFailure, DetectionRecord, ImageInput, ModelScorer};
pub use error::{PhotoCriticError, Result};
pub use scoring::{score, AnalysisMethod, FallbackReason, ScoreResult};
