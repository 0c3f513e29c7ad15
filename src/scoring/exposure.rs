// Exposure scoring
// Brightness of the most dominant color plus tonal range from the palette size

use crate::constants::{
    EXPOSURE_ACCEPTABLE, EXPOSURE_ACCEPTABLE_BONUS, EXPOSURE_BASE_SCORE, EXPOSURE_EXTREME_BONUS,
    EXPOSURE_MARGINAL, EXPOSURE_MARGINAL_BONUS, EXPOSURE_NO_DATA_SCORE, EXPOSURE_TONAL_RANGE_BONUS,
    EXPOSURE_WELL_EXPOSED, EXPOSURE_WELL_EXPOSED_BONUS, R_EXPO_EXTREME, R_EXPO_GOOD,
    R_EXPO_MARGINAL, R_EXPO_NO_DATA, R_EXPO_OK,
};
use crate::detection::DetectionRecord;

use super::clamp_score;

/// Returns (score 0-100, reasons)
pub fn score_exposure(record: &DetectionRecord) -> (u8, Vec<&'static str>) {
    let Some(dominant) = record.dominant_colors.first() else {
        return (clamp_score(EXPOSURE_NO_DATA_SCORE), vec![R_EXPO_NO_DATA]);
    };

    let brightness = dominant.brightness();
    let (bonus, reason) = if within(brightness, EXPOSURE_WELL_EXPOSED) {
        (EXPOSURE_WELL_EXPOSED_BONUS, R_EXPO_GOOD)
    } else if within(brightness, EXPOSURE_ACCEPTABLE) {
        (EXPOSURE_ACCEPTABLE_BONUS, R_EXPO_OK)
    } else if within(brightness, EXPOSURE_MARGINAL) {
        (EXPOSURE_MARGINAL_BONUS, R_EXPO_MARGINAL)
    } else {
        (EXPOSURE_EXTREME_BONUS, R_EXPO_EXTREME)
    };

    let tonal_index = record.dominant_colors.len().min(EXPOSURE_TONAL_RANGE_BONUS.len() - 1);
    let score = EXPOSURE_BASE_SCORE + bonus + EXPOSURE_TONAL_RANGE_BONUS[tonal_index];

    log::debug!(
        "Exposure: brightness {:.1}, {} colors -> {}",
        brightness,
        record.dominant_colors.len(),
        score
    );

    (clamp_score(score), vec![reason])
}

fn within(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low && value <= high
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DominantColor;

    fn gray(level: u8, count: usize) -> DetectionRecord {
        DetectionRecord {
            dominant_colors: (0..count)
                .map(|_| DominantColor::new(level, level, level, 0.2))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_colors_baseline() {
        assert_eq!(score_exposure(&DetectionRecord::default()), (50, vec![R_EXPO_NO_DATA]));
    }

    #[test]
    fn test_brightness_bands_are_inclusive() {
        assert_eq!(score_exposure(&gray(80, 1)).0, 80);
        assert_eq!(score_exposure(&gray(200, 1)).0, 80);
        assert_eq!(score_exposure(&gray(210, 1)).0, 65);
        assert_eq!(score_exposure(&gray(60, 1)).0, 65);
        assert_eq!(score_exposure(&gray(40, 1)).0, 50);
        assert_eq!(score_exposure(&gray(240, 1)).0, 50);
        assert_eq!(score_exposure(&gray(10, 1)).0, 35);
        assert_eq!(score_exposure(&gray(255, 1)).1, vec![R_EXPO_EXTREME]);
    }

    #[test]
    fn test_tonal_range_saturates() {
        assert_eq!(score_exposure(&gray(128, 2)).0, 85);
        assert_eq!(score_exposure(&gray(128, 5)).0, 100);
        assert_eq!(score_exposure(&gray(128, 9)).0, 100);
    }

    #[test]
    fn test_only_first_color_sets_brightness() {
        let record = DetectionRecord {
            dominant_colors: vec![
                DominantColor::new(250, 250, 250, 0.6),
                DominantColor::new(128, 128, 128, 0.4),
            ],
            ..Default::default()
        };
        let (score, reasons) = score_exposure(&record);
        assert_eq!(score, 40);
        assert_eq!(reasons, vec![R_EXPO_EXTREME]);
    }
}
