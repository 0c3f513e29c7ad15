// Composition scoring
// Face placement against the thirds band, object count and subject clarity

use crate::constants::{
    BALANCED_OBJECTS_MAX, BALANCED_OBJECTS_MIN, BUSY_OBJECTS_MIN, COMPOSITION_BALANCED_BONUS,
    COMPOSITION_BASE_SCORE, COMPOSITION_BUSY_BONUS, COMPOSITION_FACE_BONUS,
    COMPOSITION_NO_DATA_SCORE, COMPOSITION_OBJECT_BONUS, COMPOSITION_SUBJECT_BONUS,
    COMPOSITION_THIRDS_BONUS, R_COMP_BALANCED, R_COMP_BUSY, R_COMP_FACE, R_COMP_FACE_UNPLACED,
    R_COMP_NO_DATA, R_COMP_OBJECTS, R_COMP_SUBJECT, R_COMP_THIRDS_HORIZONTAL,
    R_COMP_THIRDS_VERTICAL, SUBJECT_LABEL_CONFIDENCE, THIRDS_BAND_HIGH, THIRDS_BAND_LOW,
};
use crate::detection::DetectionRecord;

use super::clamp_score;

/// Returns (score 0-100, reasons)
pub fn score_composition(record: &DetectionRecord) -> (u8, Vec<&'static str>) {
    if record.faces.is_empty() && record.objects.is_empty() && record.labels.is_empty() {
        return (clamp_score(COMPOSITION_NO_DATA_SCORE), vec![R_COMP_NO_DATA]);
    }

    let mut score = COMPOSITION_BASE_SCORE;
    let mut reasons = Vec::new();

    // Only the first face is considered
    if let Some(face) = record.faces.first() {
        score += COMPOSITION_FACE_BONUS;
        reasons.push(R_COMP_FACE);

        match face.bounding_box.center_fraction(record.image_size) {
            Some((x, y)) => {
                if in_thirds_band(y) {
                    score += COMPOSITION_THIRDS_BONUS;
                    reasons.push(R_COMP_THIRDS_VERTICAL);
                }
                if in_thirds_band(x) {
                    score += COMPOSITION_THIRDS_BONUS;
                    reasons.push(R_COMP_THIRDS_HORIZONTAL);
                }
            }
            None => {
                log::debug!("Face box is in pixel space with no image size, skipping placement");
                reasons.push(R_COMP_FACE_UNPLACED);
            }
        }
    } else if !record.objects.is_empty() {
        let count = record.objects.len();
        score += COMPOSITION_OBJECT_BONUS;
        reasons.push(R_COMP_OBJECTS);

        if (BALANCED_OBJECTS_MIN..=BALANCED_OBJECTS_MAX).contains(&count) {
            score += COMPOSITION_BALANCED_BONUS;
            reasons.push(R_COMP_BALANCED);
        } else if count >= BUSY_OBJECTS_MIN {
            score += COMPOSITION_BUSY_BONUS;
            reasons.push(R_COMP_BUSY);
        }
    }

    if record
        .labels
        .iter()
        .any(|label| label.confidence >= SUBJECT_LABEL_CONFIDENCE)
    {
        score += COMPOSITION_SUBJECT_BONUS;
        reasons.push(R_COMP_SUBJECT);
    }

    (clamp_score(score), reasons)
}

fn in_thirds_band(fraction: f64) -> bool {
    fraction > THIRDS_BAND_LOW && fraction < THIRDS_BAND_HIGH
}
