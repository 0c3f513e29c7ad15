// Focus scoring
// Mean object-detection confidence stands in for sharpness

use crate::constants::{
    FOCUS_BONUS_HIGH, FOCUS_BONUS_LOW, FOCUS_BONUS_MEDIUM, FOCUS_BONUS_MINIMAL,
    FOCUS_BONUS_VERY_HIGH, FOCUS_CONFIDENCE_HIGH, FOCUS_CONFIDENCE_LOW, FOCUS_CONFIDENCE_MEDIUM,
    FOCUS_CONFIDENCE_VERY_HIGH, FOCUS_MULTI_SUBJECT_BONUS, FOCUS_MULTI_SUBJECT_MIN,
    FOCUS_NO_DATA_SCORE, FOCUS_OBJECT_BONUS, R_FOCUS_BLURRY, R_FOCUS_MULTI_SUBJECT,
    R_FOCUS_NO_DATA, R_FOCUS_OK, R_FOCUS_SHARP, R_FOCUS_SOFT, R_FOCUS_VERY_SHARP,
};
use crate::detection::DetectionRecord;

use super::clamp_score;

/// Returns (score 0-100, reasons)
pub fn score_focus(record: &DetectionRecord) -> (u8, Vec<&'static str>) {
    let Some(mean_confidence) = record.mean_object_confidence() else {
        return (clamp_score(FOCUS_NO_DATA_SCORE), vec![R_FOCUS_NO_DATA]);
    };

    let mut score = FOCUS_OBJECT_BONUS;
    let mut reasons = Vec::new();

    let (bonus, reason) = if mean_confidence >= FOCUS_CONFIDENCE_VERY_HIGH {
        (FOCUS_BONUS_VERY_HIGH, R_FOCUS_VERY_SHARP)
    } else if mean_confidence >= FOCUS_CONFIDENCE_HIGH {
        (FOCUS_BONUS_HIGH, R_FOCUS_SHARP)
    } else if mean_confidence >= FOCUS_CONFIDENCE_MEDIUM {
        (FOCUS_BONUS_MEDIUM, R_FOCUS_OK)
    } else if mean_confidence >= FOCUS_CONFIDENCE_LOW {
        (FOCUS_BONUS_LOW, R_FOCUS_SOFT)
    } else {
        (FOCUS_BONUS_MINIMAL, R_FOCUS_BLURRY)
    };
    score += bonus;
    reasons.push(reason);

    if record.objects.len() >= FOCUS_MULTI_SUBJECT_MIN {
        score += FOCUS_MULTI_SUBJECT_BONUS;
        reasons.push(R_FOCUS_MULTI_SUBJECT);
    }

    log::debug!(
        "Focus: {} objects, mean confidence {:.3} -> {}",
        record.objects.len(),
        mean_confidence,
        score
    );

    (clamp_score(score), reasons)
}
