// Recommendation rules
// Fixed priority order: deficiencies, subject tips, combinations, then a default

use crate::constants::{
    COMBINATION_HIGH_THRESHOLD, LANDSCAPE_KEYWORD, MAX_RECOMMENDATIONS, RECOMMENDATION_THRESHOLD,
    REC_COLOR, REC_COMPOSITION, REC_CREATIVE, REC_DEFAULT, REC_EXPOSURE, REC_FOCUS,
    REC_LANDSCAPE, REC_PORTRAIT, REC_SHOOT_RAW, REC_SIMPLIFY, SIMPLIFY_OBJECTS_MIN,
};
use crate::detection::DetectionRecord;

use super::SubScores;

/// Build at most `MAX_RECOMMENDATIONS` deduplicated tips, highest priority first.
/// Subject tips need detection data and are skipped for model-only scores.
pub fn generate_recommendations(scores: &SubScores, detection: Option<&DetectionRecord>) -> Vec<String> {
    let mut tips: Vec<&'static str> = Vec::new();

    // Deficiencies
    if scores.composition < RECOMMENDATION_THRESHOLD {
        tips.push(REC_COMPOSITION);
    }
    if scores.focus < RECOMMENDATION_THRESHOLD {
        tips.push(REC_FOCUS);
    }
    if scores.exposure < RECOMMENDATION_THRESHOLD {
        tips.push(REC_EXPOSURE);
    }
    if scores.color < RECOMMENDATION_THRESHOLD {
        tips.push(REC_COLOR);
    }

    // Subject
    if let Some(record) = detection {
        if !record.faces.is_empty() {
            tips.push(REC_PORTRAIT);
        }
        if record
            .labels
            .iter()
            .any(|label| label.description.to_lowercase().contains(LANDSCAPE_KEYWORD))
        {
            tips.push(REC_LANDSCAPE);
        }
        if record.objects.len() >= SIMPLIFY_OBJECTS_MIN {
            tips.push(REC_SIMPLIFY);
        }
    }

    // Combinations
    if scores.composition >= COMBINATION_HIGH_THRESHOLD && scores.focus >= COMBINATION_HIGH_THRESHOLD {
        tips.push(REC_CREATIVE);
    }
    if scores.exposure < RECOMMENDATION_THRESHOLD && scores.color < RECOMMENDATION_THRESHOLD {
        tips.push(REC_SHOOT_RAW);
    }

    let mut recommendations: Vec<String> = Vec::with_capacity(MAX_RECOMMENDATIONS);
    for tip in tips {
        if recommendations.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !recommendations.iter().any(|existing| existing == tip) {
            recommendations.push(tip.to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations.push(REC_DEFAULT.to_string());
    }

    recommendations
}
