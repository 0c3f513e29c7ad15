// Photo Critic Constants
// Scoring policy: additive from zero, bounded to [0, 100]. Changing a value here
// changes every score; bump SCORING_VERSION when you do.

// Scoring policy version (bump when any threshold or bonus changes)
pub const SCORING_VERSION: u32 = 1;

// Sub-score bounds
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

// ----- Composition -----

pub const COMPOSITION_NO_DATA_SCORE: i32 = 50;
pub const COMPOSITION_BASE_SCORE: i32 = 20;
pub const COMPOSITION_FACE_BONUS: i32 = 30;
pub const COMPOSITION_THIRDS_BONUS: i32 = 15;     // Awarded once per axis
pub const THIRDS_BAND_LOW: f64 = 0.33;            // Exclusive
pub const THIRDS_BAND_HIGH: f64 = 0.67;           // Exclusive
pub const COMPOSITION_OBJECT_BONUS: i32 = 25;
pub const COMPOSITION_BALANCED_BONUS: i32 = 20;
pub const COMPOSITION_BUSY_BONUS: i32 = 10;
pub const BALANCED_OBJECTS_MIN: usize = 2;
pub const BALANCED_OBJECTS_MAX: usize = 5;
pub const BUSY_OBJECTS_MIN: usize = 6;
pub const COMPOSITION_SUBJECT_BONUS: i32 = 15;
pub const SUBJECT_LABEL_CONFIDENCE: f64 = 0.75;

// ----- Focus -----
// Object-detection confidence is the sharpness proxy

pub const FOCUS_NO_DATA_SCORE: i32 = 50;
pub const FOCUS_OBJECT_BONUS: i32 = 30;
pub const FOCUS_CONFIDENCE_VERY_HIGH: f64 = 0.8;
pub const FOCUS_CONFIDENCE_HIGH: f64 = 0.7;
pub const FOCUS_CONFIDENCE_MEDIUM: f64 = 0.6;
pub const FOCUS_CONFIDENCE_LOW: f64 = 0.5;
pub const FOCUS_BONUS_VERY_HIGH: i32 = 50;
pub const FOCUS_BONUS_HIGH: i32 = 40;
pub const FOCUS_BONUS_MEDIUM: i32 = 30;
pub const FOCUS_BONUS_LOW: i32 = 20;
pub const FOCUS_BONUS_MINIMAL: i32 = 10;
pub const FOCUS_MULTI_SUBJECT_MIN: usize = 4;     // "more than 3 objects"
pub const FOCUS_MULTI_SUBJECT_BONUS: i32 = 15;

// ----- Exposure -----
// Brightness of the most dominant color, inclusive bands

pub const EXPOSURE_NO_DATA_SCORE: i32 = 50;
pub const EXPOSURE_BASE_SCORE: i32 = 20;
pub const EXPOSURE_WELL_EXPOSED: (f64, f64) = (80.0, 200.0);
pub const EXPOSURE_ACCEPTABLE: (f64, f64) = (60.0, 220.0);
pub const EXPOSURE_MARGINAL: (f64, f64) = (40.0, 240.0);
pub const EXPOSURE_WELL_EXPOSED_BONUS: i32 = 50;
pub const EXPOSURE_ACCEPTABLE_BONUS: i32 = 35;
pub const EXPOSURE_MARGINAL_BONUS: i32 = 20;
pub const EXPOSURE_EXTREME_BONUS: i32 = 5;
// Indexed by dominant color count, saturating at 5+
pub const EXPOSURE_TONAL_RANGE_BONUS: [i32; 6] = [0, 10, 15, 20, 25, 30];

// ----- Color -----

pub const COLOR_NO_DATA_SCORE: i32 = 40;
// Indexed by dominant color count, saturating at 6+
pub const COLOR_PALETTE_BONUS: [i32; 7] = [0, 10, 20, 25, 30, 35, 40];
pub const COLOR_BALANCED_DOMINANCE: (f64, f64) = (0.2, 0.8);  // Exclusive
pub const COLOR_BALANCED_DOMINANCE_BONUS: i32 = 30;
pub const COLOR_MILD_DOMINANCE: (f64, f64) = (0.1, 0.9);      // Exclusive
pub const COLOR_MILD_DOMINANCE_BONUS: i32 = 15;
// Contrast = |sum(rgb1) - sum(rgb2)| / 3
pub const COLOR_CONTRAST_HIGH: f64 = 80.0;
pub const COLOR_CONTRAST_MEDIUM: f64 = 50.0;
pub const COLOR_CONTRAST_LOW: f64 = 20.0;
pub const COLOR_CONTRAST_HIGH_BONUS: i32 = 30;
pub const COLOR_CONTRAST_MEDIUM_BONUS: i32 = 20;
pub const COLOR_CONTRAST_LOW_BONUS: i32 = 10;

// ----- Recommendations -----

pub const RECOMMENDATION_THRESHOLD: u8 = 65;
pub const COMBINATION_HIGH_THRESHOLD: u8 = 80;
pub const MAX_RECOMMENDATIONS: usize = 3;
pub const SIMPLIFY_OBJECTS_MIN: usize = 4;         // "more than 3 objects"
pub const LANDSCAPE_KEYWORD: &str = "landscape";

pub const REC_COMPOSITION: &str =
    "Try the rule of thirds: place your subject along the grid lines instead of dead center.";
pub const REC_FOCUS: &str =
    "Improve sharpness with a faster shutter speed or a steadier grip, and tap to focus on your subject.";
pub const REC_EXPOSURE: &str =
    "Adjust exposure to keep detail in both highlights and shadows; exposure compensation can help.";
pub const REC_COLOR: &str =
    "Boost color by shooting in softer golden-hour light or correcting the white balance.";
pub const REC_PORTRAIT: &str =
    "Portrait detected: try portrait mode or a wider aperture to separate your subject from the background.";
pub const REC_LANDSCAPE: &str =
    "For landscapes, a polarizing filter deepens skies and cuts glare on water and foliage.";
pub const REC_SIMPLIFY: &str =
    "Simplify the composition: fewer competing subjects make a stronger image.";
pub const REC_CREATIVE: &str =
    "Your fundamentals are strong. Push your creative boundaries with unusual angles or lighting.";
pub const REC_SHOOT_RAW: &str =
    "Shoot in RAW to recover more exposure and color detail when editing.";
pub const REC_DEFAULT: &str =
    "Great shot! Keep experimenting with different perspectives and light.";

// ----- Fallback -----

pub const FALLBACK_SCORE_MIN: u8 = 40;
pub const FALLBACK_SCORE_MAX: u8 = 80;            // Inclusive
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Experiment with the rule of thirds to give your subject room to breathe.",
    "Look for soft, directional light to add depth and texture.",
    "Check focus on your main subject before pressing the shutter.",
];

// ----- Informational fields -----

pub const MAX_REPORTED_LABELS: usize = 5;

// ----- Custom model calibration -----
// Raw aesthetic scores from the evaluator model are expected in this range

pub const MODEL_RAW_MIN: f64 = 1.81;
pub const MODEL_RAW_MAX: f64 = 8.60;
pub const MODEL_NEGATIVE_CLAMP: f64 = 5.0;
pub const MODEL_LOW_BAND_SPAN: f64 = 0.3;
pub const MODEL_MIN_BASE_PERCENT: f64 = 5.0;
pub const MODEL_MIN_COMPONENT: f64 = 1.0;
pub const MODEL_WEIGHT_COMPOSITION: f64 = 0.95;
pub const MODEL_WEIGHT_FOCUS: f64 = 1.02;
pub const MODEL_WEIGHT_EXPOSURE: f64 = 0.92;
pub const MODEL_WEIGHT_COLOR: f64 = 1.03;

// ----- Backends -----

pub const ANALYZE_TIMEOUT_MS_DEFAULT: u64 = 15_000;
pub const PROCESS_POLL_INTERVAL_MS: u64 = 25;
pub const VISION_ENDPOINT_DEFAULT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const VISION_MAX_RESULTS: u32 = 10;
pub const VISION_FEATURES: [&str; 5] = [
    "LABEL_DETECTION",
    "FACE_DETECTION",
    "OBJECT_LOCALIZATION",
    "IMAGE_PROPERTIES",
    "LOGO_DETECTION",
];
pub const EVALUATOR_SCRIPT_NAME: &str = "photography_evaluator.py";
pub const TEMP_FILE_PREFIX: &str = "photocritic-";

// Environment keys
pub const ENV_VISION_API_KEY: &str = "PHOTOCRITIC_VISION_API_KEY";
pub const ENV_VISION_ENDPOINT: &str = "PHOTOCRITIC_VISION_ENDPOINT";
pub const ENV_USE_CUSTOM_MODEL: &str = "PHOTOCRITIC_USE_CUSTOM_MODEL";
pub const ENV_ANALYZE_TIMEOUT_MS: &str = "PHOTOCRITIC_ANALYZE_TIMEOUT_MS";
pub const ENV_PYTHON_PATH: &str = "PHOTOCRITIC_PYTHON_PATH";
pub const ENV_EVALUATOR_PATH: &str = "PHOTOCRITIC_EVALUATOR_PATH";
pub const ENV_CUSTOM_MODEL_PATH: &str = "CUSTOM_MODEL_PATH";
pub const ENV_LOG: &str = "PHOTOCRITIC_LOG";

// ----- Stable Reason Tokens -----
// Use these for machine-parseable reasons. Format: R_<CATEGORY>_<DETAIL>

// Composition reasons
pub const R_COMP_NO_DATA: &str = "R_COMP_NO_DATA";
pub const R_COMP_FACE: &str = "R_COMP_FACE";
pub const R_COMP_THIRDS_VERTICAL: &str = "R_COMP_THIRDS_VERTICAL";
pub const R_COMP_THIRDS_HORIZONTAL: &str = "R_COMP_THIRDS_HORIZONTAL";
pub const R_COMP_FACE_UNPLACED: &str = "R_COMP_FACE_UNPLACED";
pub const R_COMP_OBJECTS: &str = "R_COMP_OBJECTS";
pub const R_COMP_BALANCED: &str = "R_COMP_BALANCED";
pub const R_COMP_BUSY: &str = "R_COMP_BUSY";
pub const R_COMP_SUBJECT: &str = "R_COMP_SUBJECT";

// Focus reasons
pub const R_FOCUS_NO_DATA: &str = "R_FOCUS_NO_DATA";
pub const R_FOCUS_VERY_SHARP: &str = "R_FOCUS_VERY_SHARP";
pub const R_FOCUS_SHARP: &str = "R_FOCUS_SHARP";
pub const R_FOCUS_OK: &str = "R_FOCUS_OK";
pub const R_FOCUS_SOFT: &str = "R_FOCUS_SOFT";
pub const R_FOCUS_BLURRY: &str = "R_FOCUS_BLURRY";
pub const R_FOCUS_MULTI_SUBJECT: &str = "R_FOCUS_MULTI_SUBJECT";

// Exposure reasons
pub const R_EXPO_NO_DATA: &str = "R_EXPO_NO_DATA";
pub const R_EXPO_GOOD: &str = "R_EXPO_GOOD";
pub const R_EXPO_OK: &str = "R_EXPO_OK";
pub const R_EXPO_MARGINAL: &str = "R_EXPO_MARGINAL";
pub const R_EXPO_EXTREME: &str = "R_EXPO_EXTREME";

// Color reasons
pub const R_COLOR_NO_DATA: &str = "R_COLOR_NO_DATA";
pub const R_COLOR_BALANCED: &str = "R_COLOR_BALANCED";
pub const R_COLOR_DOMINANT: &str = "R_COLOR_DOMINANT";
pub const R_COLOR_HIGH_CONTRAST: &str = "R_COLOR_HIGH_CONTRAST";
pub const R_COLOR_LOW_CONTRAST: &str = "R_COLOR_LOW_CONTRAST";

// General reasons
pub const R_MODEL: &str = "R_MODEL";
pub const R_FALLBACK: &str = "R_FALLBACK";
