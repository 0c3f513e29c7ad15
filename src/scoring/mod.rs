// Scoring Engine
// Turns a DetectionRecord (or direct model scores) into four bounded sub-scores,
// descriptors and prioritized recommendations

pub mod color;
pub mod composition;
pub mod descriptors;
pub mod exposure;
pub mod fallback;
pub mod focus;
pub mod recommendations;


use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_REPORTED_LABELS, R_MODEL, SCORE_MAX, SCORE_MIN, SCORING_VERSION};
use crate::detection::{DetectionRecord, ModelScores};

use descriptors::{ColorDescriptors, CompositionDescriptors, ExposureDescriptors, FocusDescriptors};

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    Vision,
    CustomModel,
    Fallback,
}

/// Why the fallback path was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NoBackend,
    BackendFailure,
    Timeout,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::NoBackend => "no_backend",
            FallbackReason::BackendFailure => "backend_failure",
            FallbackReason::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// The four sub-scores, each already clamped to 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub composition: u8,
    pub focus: u8,
    pub exposure: u8,
    pub color: u8,
}

impl SubScores {
    /// Rounded mean, half away from zero
    pub fn overall(&self) -> u8 {
        let sum = self.composition as u32 + self.focus as u32 + self.exposure as u32 + self.color as u32;
        (sum as f64 / 4.0).round() as u8
    }
}

/// Result of scoring a single photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub composition: u8,
    pub focus: u8,
    pub exposure: u8,
    pub color: u8,
    pub overall: u8,
    pub composition_details: CompositionDescriptors,
    pub focus_details: FocusDescriptors,
    pub exposure_details: ExposureDescriptors,
    pub color_details: ColorDescriptors,
    pub recommendations: Vec<String>,
    pub method: AnalysisMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub logos: Vec<String>,
    pub scoring_version: u32,
}

impl ScoreResult {
    pub fn sub_scores(&self) -> SubScores {
        SubScores {
            composition: self.composition,
            focus: self.focus,
            exposure: self.exposure,
            color: self.color,
        }
    }

    fn from_parts(
        scores: SubScores,
        method: AnalysisMethod,
        detection: Option<&DetectionRecord>,
        reasons: Vec<&'static str>,
    ) -> Self {
        let (labels, logos) = match detection {
            Some(record) => (
                record
                    .labels
                    .iter()
                    .take(MAX_REPORTED_LABELS)
                    .map(|l| l.description.clone())
                    .collect(),
                record.logos.clone(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            composition: scores.composition,
            focus: scores.focus,
            exposure: scores.exposure,
            color: scores.color,
            overall: scores.overall(),
            composition_details: CompositionDescriptors::from_score(scores.composition),
            focus_details: FocusDescriptors::from_score(scores.focus),
            exposure_details: ExposureDescriptors::from_score(scores.exposure),
            color_details: ColorDescriptors::from_score(scores.color),
            recommendations: recommendations::generate_recommendations(&scores, detection),
            method,
            fallback_reason: None,
            reasons: reasons.into_iter().map(String::from).collect(),
            labels,
            logos,
            scoring_version: SCORING_VERSION,
        }
    }
}

/// Clamp a raw additive score into 0-100
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(SCORE_MIN, SCORE_MAX) as u8
}

/// Score detection data, or fall back to randomized scores when there is none.
/// Never fails.
pub fn score<R: Rng + ?Sized>(detection: Option<&DetectionRecord>, rng: &mut R) -> ScoreResult {
    match detection {
        Some(record) => score_detection(record),
        None => fallback::fallback_score(rng, FallbackReason::NoBackend),
    }
}

/// Deterministic heuristic scoring. An empty record yields the no-data baselines.
pub fn score_detection(record: &DetectionRecord) -> ScoreResult {
    if record.is_empty() {
        log::debug!("Detection record is empty, scoring from no-data baselines");
    }

    let (composition, mut reasons) = composition::score_composition(record);
    let (focus, focus_reasons) = focus::score_focus(record);
    let (exposure, exposure_reasons) = exposure::score_exposure(record);
    let (color, color_reasons) = color::score_color(record);
    reasons.extend(focus_reasons);
    reasons.extend(exposure_reasons);
    reasons.extend(color_reasons);

    let scores = SubScores { composition, focus, exposure, color };
    log::debug!("Heuristic scores: {:?} (overall {})", scores, scores.overall());

    ScoreResult::from_parts(scores, AnalysisMethod::Vision, Some(record), reasons)
}

/// Wrap scores produced directly by a model
pub fn score_model(model: &ModelScores) -> ScoreResult {
    let scores = SubScores {
        composition: clamp_model_score(model.composition),
        focus: clamp_model_score(model.focus),
        exposure: clamp_model_score(model.exposure),
        color: clamp_model_score(model.color),
    };

    ScoreResult::from_parts(scores, AnalysisMethod::CustomModel, None, vec![R_MODEL])
}

fn clamp_model_score(value: f64) -> u8 {
    if value.is_nan() {
        return SCORE_MIN as u8;
    }
    value.round().clamp(SCORE_MIN as f64, SCORE_MAX as f64) as u8
}
