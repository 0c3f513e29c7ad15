// Custom aesthetic model backend
// Runs the external photography evaluator on a temporary copy of the image and
// reads its JSON scores from the last line of stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::process::run_with_timeout;
use super::{DetectionFailure, ImageInput, ModelScorer};
use crate::constants::{
    ENV_CUSTOM_MODEL_PATH, MODEL_LOW_BAND_SPAN, MODEL_MIN_BASE_PERCENT, MODEL_MIN_COMPONENT,
    MODEL_NEGATIVE_CLAMP, MODEL_RAW_MAX, MODEL_RAW_MIN, MODEL_WEIGHT_COLOR,
    MODEL_WEIGHT_COMPOSITION, MODEL_WEIGHT_EXPOSURE, MODEL_WEIGHT_FOCUS, TEMP_FILE_PREFIX,
};
use crate::tools;

/// Sub-scores reported by the model, on a 0-100 scale (unclamped)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub composition: f64,
    pub focus: f64,
    pub exposure: f64,
    pub color: f64,
}

#[derive(Debug, Deserialize)]
struct EvaluatorOutput {
    composition_score: Option<f64>,
    focus_score: Option<f64>,
    exposure_score: Option<f64>,
    color_score: Option<f64>,
    raw_score: Option<f64>,
    error: Option<String>,
}

/// Evaluator invoked as `<interpreter> <script> <image path>`
#[derive(Debug, Clone)]
pub struct ProcessModelScorer {
    interpreter: PathBuf,
    script: PathBuf,
    model_path: Option<PathBuf>,
}

impl ProcessModelScorer {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            model_path: None,
        }
    }

    /// Interpreter and script resolved through the sidecar tool lookup
    pub fn from_tools() -> Self {
        Self::new(tools::python_path(), tools::evaluator_path())
    }

    /// Model weights location forwarded to the evaluator as CUSTOM_MODEL_PATH
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }
}

impl ModelScorer for ProcessModelScorer {
    fn name(&self) -> &'static str {
        "custom_model"
    }

    fn evaluate(&self, image: &ImageInput, timeout: Duration) -> Result<ModelScores, DetectionFailure> {
        let suffix = image
            .extension()
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| ".img".to_string());

        let mut file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&image.bytes)?;
        file.flush()?;

        // Close our handle but keep the path; it is removed when `input` drops
        let input = file.into_temp_path();

        log::debug!(
            "Evaluating {} ({} bytes) with {}",
            image.display_name,
            image.bytes.len(),
            self.script.display()
        );

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.script).arg(input.as_os_str());
        if let Some(model) = &self.model_path {
            cmd.env(ENV_CUSTOM_MODEL_PATH, model);
        }

        let output = run_with_timeout(&mut cmd, timeout)?;

        if !output.status.success() {
            return Err(DetectionFailure::ProcessExit {
                code: output.status.code().unwrap_or(-1),
                stderr: tail(&output.stderr, 5),
            });
        }

        parse_evaluator_output(&output.stdout)
    }
}

/// Parse the evaluator's final stdout line
fn parse_evaluator_output(stdout: &str) -> Result<ModelScores, DetectionFailure> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| DetectionFailure::Malformed("evaluator produced no output".to_string()))?;

    let parsed: EvaluatorOutput = serde_json::from_str(line)
        .map_err(|e| DetectionFailure::Malformed(format!("Failed to parse evaluator output: {}", e)))?;

    // Error payloads carry placeholder scores; never trust them
    if let Some(err) = parsed.error {
        return Err(DetectionFailure::ModelError(err));
    }

    match (
        parsed.composition_score,
        parsed.focus_score,
        parsed.exposure_score,
        parsed.color_score,
    ) {
        (Some(composition), Some(focus), Some(exposure), Some(color)) => Ok(ModelScores {
            composition,
            focus,
            exposure,
            color,
        }),
        _ => match parsed.raw_score {
            Some(raw) => Ok(calibrate_raw_score(raw)),
            None => Err(DetectionFailure::Malformed(
                "evaluator output is missing component scores".to_string(),
            )),
        },
    }
}

/// Map a raw aesthetic prediction onto the four 0-100 sub-scores.
///
/// The model is trained on a [1.81, 8.60] rating scale but may emit values
/// outside it; each band is folded back into that range before scaling.
pub fn calibrate_raw_score(raw: f64) -> ModelScores {
    let range = MODEL_RAW_MAX - MODEL_RAW_MIN;

    let adjusted = if raw < 0.0 {
        let clamped = raw.clamp(-MODEL_NEGATIVE_CLAMP, MODEL_NEGATIVE_CLAMP);
        MODEL_RAW_MIN + ((clamped + MODEL_NEGATIVE_CLAMP) / (2.0 * MODEL_NEGATIVE_CLAMP)) * range
    } else if raw <= 1.0 {
        MODEL_RAW_MIN + raw * range
    } else if raw < MODEL_RAW_MIN {
        MODEL_RAW_MIN + ((raw - 1.0) / (MODEL_RAW_MIN - 1.0)) * range * MODEL_LOW_BAND_SPAN
    } else if raw <= MODEL_RAW_MAX {
        raw
    } else {
        MODEL_RAW_MIN + ((raw.abs() % 10.0) / 10.0) * range
    };

    let base = (((adjusted - MODEL_RAW_MIN) / range) * 100.0).max(MODEL_MIN_BASE_PERCENT);

    ModelScores {
        composition: (base * MODEL_WEIGHT_COMPOSITION).max(MODEL_MIN_COMPONENT),
        focus: (base * MODEL_WEIGHT_FOCUS).max(MODEL_MIN_COMPONENT),
        exposure: (base * MODEL_WEIGHT_EXPOSURE).max(MODEL_MIN_COMPONENT),
        color: (base * MODEL_WEIGHT_COLOR).max(MODEL_MIN_COMPONENT),
    }
}

/// Last `n` non-empty lines of a process stream
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_component_scores() {
        let stdout = r#"{"composition_score": 71.2, "focus_score": 80.0, "exposure_score": 65.5, "color_score": 90.0, "overall_score": 76.7}"#;
        let scores = parse_evaluator_output(stdout).unwrap();
        assert_eq!(scores.composition, 71.2);
        assert_eq!(scores.color, 90.0);
    }

    #[test]
    fn test_parse_uses_last_line() {
        let stdout = "warming up\n\n{\"composition_score\": 1, \"focus_score\": 2, \"exposure_score\": 3, \"color_score\": 4}\n\n";
        let scores = parse_evaluator_output(stdout).unwrap();
        assert_eq!(scores.exposure, 3.0);
    }

    #[test]
    fn test_parse_error_payload_is_failure() {
        let stdout = r#"{"error": "Image evaluation error: cannot identify image file", "composition_score": 50, "focus_score": 50, "exposure_score": 50, "color_score": 50}"#;
        let err = parse_evaluator_output(stdout).unwrap_err();
        assert!(matches!(err, DetectionFailure::ModelError(_)));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_evaluator_output("Traceback (most recent call last):"),
            Err(DetectionFailure::Malformed(_))
        ));
        assert!(matches!(parse_evaluator_output("   \n"), Err(DetectionFailure::Malformed(_))));
        assert!(matches!(
            parse_evaluator_output(r#"{"focus_score": 10}"#),
            Err(DetectionFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_raw_score_is_calibrated() {
        let scores = parse_evaluator_output(r#"{"raw_score": 5.205}"#).unwrap();
        assert!((scores.focus - 51.0).abs() < 1e-6);
    }

    #[test]
    fn test_calibrate_in_range_midpoint() {
        let midpoint = (MODEL_RAW_MIN + MODEL_RAW_MAX) / 2.0;
        let scores = calibrate_raw_score(midpoint);
        assert!((scores.composition - 47.5).abs() < 1e-6);
        assert!((scores.focus - 51.0).abs() < 1e-6);
        assert!((scores.exposure - 46.0).abs() < 1e-6);
        assert!((scores.color - 51.5).abs() < 1e-6);
    }

    #[test]
    fn test_calibrate_unit_interval() {
        let scores = calibrate_raw_score(0.5);
        assert!((scores.focus - 51.0).abs() < 1e-6);
    }

    #[test]
    fn test_calibrate_floor_applies() {
        // Bottom of every band collapses to the 5% floor
        for raw in [-5.0, -100.0, 0.0, 1.0001] {
            let scores = calibrate_raw_score(raw);
            assert!((scores.composition - 4.75).abs() < 1e-6, "raw {} gave {:?}", raw, scores);
        }
    }

    #[test]
    fn test_calibrate_negative_is_shifted() {
        // Zero sits in the middle of the [-5, 5] band
        let scores = calibrate_raw_score(-0.0001);
        assert!((scores.focus - 51.0).abs() < 0.01);
    }

    #[test]
    fn test_calibrate_large_values_wrap() {
        // 15.0 -> 5.0 mod 10 -> halfway
        let scores = calibrate_raw_score(15.0);
        assert!((scores.focus - 51.0).abs() < 1e-6);
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\n\nc\nd\n", 2), "c\nd");
        assert_eq!(tail("", 3), "");
    }

    #[cfg(unix)]
    mod evaluator_process {
        use super::super::*;
        use std::fs;
        use std::path::Path;
        use tempfile::TempDir;

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let script = dir.join("evaluator.sh");
            fs::write(&script, body).unwrap();
            script
        }

        #[test]
        fn test_evaluate_reads_scores_and_removes_input() {
            let dir = TempDir::new().unwrap();
            let marker = dir.path().join("input-path");
            let copy = dir.path().join("input-copy");
            let script = write_script(
                dir.path(),
                &format!(
                    "echo \"$1\" > '{}'\ncp \"$1\" '{}'\necho 'loading model' 1>&2\n\
                     echo '{{\"composition_score\": 70.0, \"focus_score\": 81.5, \"exposure_score\": 60.0, \"color_score\": 90.0}}'\n",
                    marker.display(),
                    copy.display()
                ),
            );

            let scorer = ProcessModelScorer::new("sh", &script);
            let image = ImageInput::new(b"fake jpeg bytes".to_vec(), "cat.jpg");
            let scores = scorer.evaluate(&image, Duration::from_secs(10)).unwrap();

            assert_eq!(scores.focus, 81.5);
            assert_eq!(fs::read(&copy).unwrap(), b"fake jpeg bytes");

            let input_path = fs::read_to_string(&marker).unwrap();
            let input_path = input_path.trim();
            assert!(input_path.ends_with(".jpg"));
            assert!(!Path::new(input_path).exists(), "temp input should be removed");
        }

        #[test]
        fn test_evaluate_forwards_model_path() {
            let dir = TempDir::new().unwrap();
            let script = write_script(
                dir.path(),
                "echo \"{\\\"raw_score\\\": 5.205, \\\"model\\\": \\\"$CUSTOM_MODEL_PATH\\\"}\"\n\
                 test \"$CUSTOM_MODEL_PATH\" = /models/best.pth || exit 7\n",
            );

            let scorer = ProcessModelScorer::new("sh", &script).with_model_path("/models/best.pth");
            let image = ImageInput::new(vec![0u8; 4], "upload");
            let scores = scorer.evaluate(&image, Duration::from_secs(10)).unwrap();
            assert!((scores.focus - 51.0).abs() < 1e-6);
        }

        #[test]
        fn test_evaluate_non_zero_exit() {
            let dir = TempDir::new().unwrap();
            let script = write_script(dir.path(), "echo 'model file not found' 1>&2\nexit 2\n");

            let scorer = ProcessModelScorer::new("sh", &script);
            let image = ImageInput::new(vec![1, 2, 3], "a.png");
            match scorer.evaluate(&image, Duration::from_secs(10)) {
                Err(DetectionFailure::ProcessExit { code, stderr }) => {
                    assert_eq!(code, 2);
                    assert!(stderr.contains("model file not found"));
                }
                other => panic!("expected process exit, got {:?}", other),
            }
        }

        #[test]
        fn test_evaluate_timeout_removes_input() {
            let dir = TempDir::new().unwrap();
            let marker = dir.path().join("input-path");
            let script = write_script(
                dir.path(),
                &format!("echo \"$1\" > '{}'\nexec sleep 5\n", marker.display()),
            );

            let scorer = ProcessModelScorer::new("sh", &script);
            let image = ImageInput::new(vec![9; 16], "slow.jpg");
            let err = scorer.evaluate(&image, Duration::from_millis(500)).unwrap_err();
            assert!(err.is_timeout(), "expected timeout, got {}", err);

            let input_path = fs::read_to_string(&marker).unwrap();
            assert!(!Path::new(input_path.trim()).exists());
        }
    }
}
