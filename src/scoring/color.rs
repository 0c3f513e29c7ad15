// Color scoring
// Palette size, dominance of the top color and contrast between the top two

use crate::constants::{
    COLOR_BALANCED_DOMINANCE, COLOR_BALANCED_DOMINANCE_BONUS, COLOR_CONTRAST_HIGH,
    COLOR_CONTRAST_HIGH_BONUS, COLOR_CONTRAST_LOW, COLOR_CONTRAST_LOW_BONUS,
    COLOR_CONTRAST_MEDIUM, COLOR_CONTRAST_MEDIUM_BONUS, COLOR_MILD_DOMINANCE,
    COLOR_MILD_DOMINANCE_BONUS, COLOR_NO_DATA_SCORE, COLOR_PALETTE_BONUS, R_COLOR_BALANCED,
    R_COLOR_DOMINANT, R_COLOR_HIGH_CONTRAST, R_COLOR_LOW_CONTRAST, R_COLOR_NO_DATA,
};
use crate::detection::DetectionRecord;

use super::clamp_score;

/// Returns (score 0-100, reasons)
pub fn score_color(record: &DetectionRecord) -> (u8, Vec<&'static str>) {
    let colors = &record.dominant_colors;
    let Some(dominant) = colors.first() else {
        return (clamp_score(COLOR_NO_DATA_SCORE), vec![R_COLOR_NO_DATA]);
    };

    let mut reasons = Vec::new();
    let mut score = COLOR_PALETTE_BONUS[colors.len().min(COLOR_PALETTE_BONUS.len() - 1)];

    if between(dominant.coverage, COLOR_BALANCED_DOMINANCE) {
        score += COLOR_BALANCED_DOMINANCE_BONUS;
        reasons.push(R_COLOR_BALANCED);
    } else if between(dominant.coverage, COLOR_MILD_DOMINANCE) {
        score += COLOR_MILD_DOMINANCE_BONUS;
    } else {
        reasons.push(R_COLOR_DOMINANT);
    }

    if let Some(second) = colors.get(1) {
        let contrast = contrast(dominant.channel_sum(), second.channel_sum());
        if contrast >= COLOR_CONTRAST_HIGH {
            score += COLOR_CONTRAST_HIGH_BONUS;
            reasons.push(R_COLOR_HIGH_CONTRAST);
        } else if contrast >= COLOR_CONTRAST_MEDIUM {
            score += COLOR_CONTRAST_MEDIUM_BONUS;
        } else if contrast >= COLOR_CONTRAST_LOW {
            score += COLOR_CONTRAST_LOW_BONUS;
        } else {
            reasons.push(R_COLOR_LOW_CONTRAST);
        }
    }

    (clamp_score(score), reasons)
}

fn between(value: f64, (low, high): (f64, f64)) -> bool {
    value > low && value < high
}

fn contrast(first_sum: u32, second_sum: u32) -> f64 {
    first_sum.abs_diff(second_sum) as f64 / 3.0
}
