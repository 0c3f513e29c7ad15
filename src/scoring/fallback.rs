// Fallback scoring
// Plausible randomized result used when no backend produced data

use rand::Rng;

use crate::constants::{FALLBACK_RECOMMENDATIONS, FALLBACK_SCORE_MAX, FALLBACK_SCORE_MIN, R_FALLBACK};

use super::descriptors::{ColorDescriptors, CompositionDescriptors, ExposureDescriptors, FocusDescriptors};
use super::{AnalysisMethod, FallbackReason, ScoreResult, SubScores};

pub fn fallback_score<R: Rng + ?Sized>(rng: &mut R, reason: FallbackReason) -> ScoreResult {
    let scores = SubScores {
        composition: draw(rng),
        focus: draw(rng),
        exposure: draw(rng),
        color: draw(rng),
    };

    log::debug!("Fallback scores ({}): {:?}", reason, scores);

    ScoreResult {
        composition: scores.composition,
        focus: scores.focus,
        exposure: scores.exposure,
        color: scores.color,
        overall: scores.overall(),
        composition_details: CompositionDescriptors::random(rng),
        focus_details: FocusDescriptors::random(rng),
        exposure_details: ExposureDescriptors::random(rng),
        color_details: ColorDescriptors::random(rng),
        recommendations: FALLBACK_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        method: AnalysisMethod::Fallback,
        fallback_reason: Some(reason),
        reasons: vec![R_FALLBACK.to_string()],
        labels: Vec::new(),
        logos: Vec::new(),
        scoring_version: crate::constants::SCORING_VERSION,
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(FALLBACK_SCORE_MIN..=FALLBACK_SCORE_MAX)
}
