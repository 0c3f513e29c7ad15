// Qualitative descriptors
// Fixed-vocabulary labels derived from sub-scores by ordered cutoffs

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered (minimum score, label) cutoffs, checked top-down, with a floor label
#[derive(Debug, Clone, Copy)]
pub struct DescriptorScale {
    cutoffs: &'static [(u8, &'static str)],
    floor: &'static str,
}

impl DescriptorScale {
    pub const fn new(cutoffs: &'static [(u8, &'static str)], floor: &'static str) -> Self {
        Self { cutoffs, floor }
    }

    pub fn label(&self, score: u8) -> &'static str {
        self.cutoffs
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, label)| *label)
            .unwrap_or(self.floor)
    }

    /// Every label this scale can produce, best first
    pub fn vocabulary(&self) -> Vec<&'static str> {
        self.cutoffs
            .iter()
            .map(|(_, label)| *label)
            .chain(std::iter::once(self.floor))
            .collect()
    }

    /// Uniform pick from the vocabulary
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        let index = rng.gen_range(0..=self.cutoffs.len());
        self.cutoffs.get(index).map(|(_, label)| *label).unwrap_or(self.floor)
    }
}

// Composition
pub const RULE_OF_THIRDS: DescriptorScale =
    DescriptorScale::new(&[(85, "Excellent"), (70, "Good"), (50, "Fair")], "Needs Work");
pub const BALANCE: DescriptorScale =
    DescriptorScale::new(&[(80, "Well Balanced"), (60, "Balanced")], "Unbalanced");
pub const LEADING_LINES: DescriptorScale =
    DescriptorScale::new(&[(75, "Strong"), (55, "Present")], "Weak");
pub const SYMMETRY: DescriptorScale =
    DescriptorScale::new(&[(80, "Symmetrical"), (60, "Partially Symmetrical")], "Asymmetrical");

// Focus
pub const SHARPNESS: DescriptorScale =
    DescriptorScale::new(&[(85, "Very Sharp"), (70, "Sharp")], "Slightly Soft");
pub const SUBJECT_FOCUS: DescriptorScale =
    DescriptorScale::new(&[(85, "Excellent"), (70, "Good"), (50, "Fair")], "Poor");
pub const DEPTH_OF_FIELD: DescriptorScale =
    DescriptorScale::new(&[(80, "Well Controlled"), (60, "Adequate")], "Unfocused");

// Exposure
pub const BRIGHTNESS: DescriptorScale =
    DescriptorScale::new(&[(80, "Well Exposed"), (60, "Slightly Off")], "Poorly Exposed");
pub const HIGHLIGHTS: DescriptorScale =
    DescriptorScale::new(&[(75, "Preserved"), (55, "Slightly Clipped")], "Clipped");
pub const SHADOWS: DescriptorScale =
    DescriptorScale::new(&[(75, "Detailed"), (55, "Slightly Crushed")], "Crushed");
pub const DYNAMIC_RANGE: DescriptorScale =
    DescriptorScale::new(&[(85, "Wide"), (65, "Moderate")], "Limited");

// Color
pub const SATURATION: DescriptorScale =
    DescriptorScale::new(&[(80, "Vibrant"), (60, "Natural")], "Muted");
pub const HARMONY: DescriptorScale =
    DescriptorScale::new(&[(80, "Harmonious"), (60, "Balanced")], "Discordant");
pub const WHITE_BALANCE: DescriptorScale =
    DescriptorScale::new(&[(75, "Accurate"), (55, "Slightly Off")], "Off");
pub const CONTRAST: DescriptorScale =
    DescriptorScale::new(&[(80, "High"), (60, "Medium")], "Low");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDescriptors {
    pub rule_of_thirds: String,
    pub balance: String,
    pub leading_lines: String,
    pub symmetry: String,
}

impl CompositionDescriptors {
    pub fn from_score(score: u8) -> Self {
        Self {
            rule_of_thirds: RULE_OF_THIRDS.label(score).to_string(),
            balance: BALANCE.label(score).to_string(),
            leading_lines: LEADING_LINES.label(score).to_string(),
            symmetry: SYMMETRY.label(score).to_string(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            rule_of_thirds: RULE_OF_THIRDS.choose(rng).to_string(),
            balance: BALANCE.choose(rng).to_string(),
            leading_lines: LEADING_LINES.choose(rng).to_string(),
            symmetry: SYMMETRY.choose(rng).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusDescriptors {
    pub sharpness: String,
    pub subject_focus: String,
    pub depth_of_field: String,
}

impl FocusDescriptors {
    pub fn from_score(score: u8) -> Self {
        Self {
            sharpness: SHARPNESS.label(score).to_string(),
            subject_focus: SUBJECT_FOCUS.label(score).to_string(),
            depth_of_field: DEPTH_OF_FIELD.label(score).to_string(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            sharpness: SHARPNESS.choose(rng).to_string(),
            subject_focus: SUBJECT_FOCUS.choose(rng).to_string(),
            depth_of_field: DEPTH_OF_FIELD.choose(rng).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureDescriptors {
    pub brightness: String,
    pub highlights: String,
    pub shadows: String,
    pub dynamic_range: String,
}

impl ExposureDescriptors {
    pub fn from_score(score: u8) -> Self {
        Self {
            brightness: BRIGHTNESS.label(score).to_string(),
            highlights: HIGHLIGHTS.label(score).to_string(),
            shadows: SHADOWS.label(score).to_string(),
            dynamic_range: DYNAMIC_RANGE.label(score).to_string(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            brightness: BRIGHTNESS.choose(rng).to_string(),
            highlights: HIGHLIGHTS.choose(rng).to_string(),
            shadows: SHADOWS.choose(rng).to_string(),
            dynamic_range: DYNAMIC_RANGE.choose(rng).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDescriptors {
    pub saturation: String,
    pub harmony: String,
    pub white_balance: String,
    pub contrast: String,
}

impl ColorDescriptors {
    pub fn from_score(score: u8) -> Self {
        Self {
            saturation: SATURATION.label(score).to_string(),
            harmony: HARMONY.label(score).to_string(),
            white_balance: WHITE_BALANCE.label(score).to_string(),
            contrast: CONTRAST.label(score).to_string(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            saturation: SATURATION.choose(rng).to_string(),
            harmony: HARMONY.choose(rng).to_string(),
            white_balance: WHITE_BALANCE.choose(rng).to_string(),
            contrast: CONTRAST.choose(rng).to_string(),
        }
    }
}
