// Photo analyzer
// Runs the configured backend chain (custom model -> vision -> fallback) and
// always produces a ScoreResult

use std::time::Duration;

use rand::Rng;

use crate::config::AnalyzerConfig;
use crate::detection::{
    CloudVisionBackend, DetectionBackend, DetectionFailure, ImageInput, ModelScorer,
    ProcessModelScorer,
};
use crate::error::Result;
use crate::scoring::{fallback::fallback_score, score_detection, score_model, FallbackReason, ScoreResult};

/// Configured backend chain
pub enum Strategy {
    /// Custom model first, then vision if configured
    CustomModel {
        model: Box<dyn ModelScorer>,
        vision: Option<Box<dyn DetectionBackend>>,
    },
    Vision(Box<dyn DetectionBackend>),
    /// No backend: every analysis uses fallback scores
    Disabled,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::CustomModel { vision: Some(_), .. } => "custom_model+vision",
            Strategy::CustomModel { vision: None, .. } => "custom_model",
            Strategy::Vision(_) => "vision",
            Strategy::Disabled => "disabled",
        }
    }
}

pub struct PhotoAnalyzer {
    strategy: Strategy,
    timeout: Duration,
}

impl PhotoAnalyzer {
    pub fn new(strategy: Strategy, timeout: Duration) -> Self {
        Self { strategy, timeout }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let vision: Option<Box<dyn DetectionBackend>> = match &config.vision_api_key {
            Some(key) => Some(Box::new(CloudVisionBackend::new(config.vision_endpoint.as_str(), key.as_str())?)),
            None => None,
        };

        let strategy = if config.use_custom_model {
            let mut scorer = ProcessModelScorer::from_tools();
            if let Some(path) = &config.custom_model_path {
                scorer = scorer.with_model_path(path);
            }
            Strategy::CustomModel { model: Box::new(scorer), vision }
        } else if let Some(vision) = vision {
            Strategy::Vision(vision)
        } else {
            Strategy::Disabled
        };

        log::info!(
            "Photo analyzer strategy: {} (timeout {:?})",
            strategy.name(),
            config.timeout
        );

        Ok(Self::new(strategy, config.timeout))
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn analyze(&self, image: &ImageInput) -> ScoreResult {
        self.analyze_with_rng(image, &mut rand::thread_rng())
    }

    /// Same as `analyze`, with the randomness for fallback scores supplied by the caller
    pub fn analyze_with_rng<R: Rng + ?Sized>(&self, image: &ImageInput, rng: &mut R) -> ScoreResult {
        match &self.strategy {
            Strategy::CustomModel { model, vision } => match model.evaluate(image, self.timeout) {
                Ok(scores) => score_model(&scores),
                Err(failure) => {
                    log_failure(model.name(), image, &failure);
                    match vision {
                        Some(backend) => self.run_vision(backend.as_ref(), image, rng),
                        None => fallback_score(rng, fallback_reason(&failure)),
                    }
                }
            },
            Strategy::Vision(backend) => self.run_vision(backend.as_ref(), image, rng),
            Strategy::Disabled => {
                log::info!("No backend configured, using fallback scores for {}", image.display_name);
                fallback_score(rng, FallbackReason::NoBackend)
            }
        }
    }

    fn run_vision<R: Rng + ?Sized>(
        &self,
        backend: &dyn DetectionBackend,
        image: &ImageInput,
        rng: &mut R,
    ) -> ScoreResult {
        match backend.detect(image, self.timeout) {
            Ok(record) => score_detection(&record),
            Err(failure) => {
                log_failure(backend.name(), image, &failure);
                fallback_score(rng, fallback_reason(&failure))
            }
        }
    }
}

fn fallback_reason(failure: &DetectionFailure) -> FallbackReason {
    match failure {
        DetectionFailure::NotConfigured => FallbackReason::NoBackend,
        DetectionFailure::Timeout(_) => FallbackReason::Timeout,
        _ => FallbackReason::BackendFailure,
    }
}

fn log_failure(backend: &str, image: &ImageInput, failure: &DetectionFailure) {
    match failure {
        DetectionFailure::NotConfigured => {
            log::info!("{} backend not configured for {}", backend, image.display_name)
        }
        _ => log::warn!("{} backend failed for {}: {}", backend, image.display_name, failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::detection::{DetectedObject, DetectionRecord, ModelScores};
    use crate::scoring::AnalysisMethod;

    enum Outcome {
        Record(DetectionRecord),
        Fail(fn() -> DetectionFailure),
    }

    struct StubVision {
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    impl DetectionBackend for StubVision {
        fn name(&self) -> &'static str {
            "stub_vision"
        }

        fn detect(&self, _image: &ImageInput, _timeout: Duration) -> std::result::Result<DetectionRecord, DetectionFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Record(record) => Ok(record.clone()),
                Outcome::Fail(make) => Err(make()),
            }
        }
    }

    struct StubModel {
        scores: Option<ModelScores>,
    }

    impl ModelScorer for StubModel {
        fn name(&self) -> &'static str {
            "stub_model"
        }

        fn evaluate(&self, _image: &ImageInput, _timeout: Duration) -> std::result::Result<ModelScores, DetectionFailure> {
            self.scores
                .ok_or_else(|| DetectionFailure::ProcessExit { code: 1, stderr: "model missing".into() })
        }
    }

    fn vision(outcome: Outcome) -> (Box<dyn DetectionBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(StubVision { outcome, calls: calls.clone() }), calls)
    }

    fn busy_record() -> DetectionRecord {
        DetectionRecord {
            objects: [0.9, 0.85, 0.88, 0.91]
                .iter()
                .map(|&confidence| DetectedObject { name: "Dog".into(), confidence })
                .collect(),
            ..Default::default()
        }
    }

    fn image() -> ImageInput {
        ImageInput::new(vec![0xFF, 0xD8, 0xFF], "dog.jpg")
    }

    fn timeout() -> Duration {
        Duration::from_millis(50)
    }

    #[test]
    fn test_vision_success_scores_detection() {
        let (backend, calls) = vision(Outcome::Record(busy_record()));
        let analyzer = PhotoAnalyzer::new(Strategy::Vision(backend), timeout());

        let result = analyzer.analyze(&image());
        assert_eq!(result.method, AnalysisMethod::Vision);
        assert_eq!(result.focus, 95);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_vision_timeout_falls_back() {
        let (backend, _) = vision(Outcome::Fail(|| DetectionFailure::Timeout(Duration::from_millis(50))));
        let analyzer = PhotoAnalyzer::new(Strategy::Vision(backend), timeout());

        let result = analyzer.analyze_with_rng(&image(), &mut StdRng::seed_from_u64(4));
        assert_eq!(result.method, AnalysisMethod::Fallback);
        assert_eq!(result.fallback_reason, Some(FallbackReason::Timeout));
        for s in [result.composition, result.focus, result.exposure, result.color] {
            assert!((40..=80).contains(&s));
        }
    }

    #[test]
    fn test_vision_error_is_backend_failure() {
        let (backend, _) = vision(Outcome::Fail(|| DetectionFailure::Status { status: 403, body: "denied".into() }));
        let analyzer = PhotoAnalyzer::new(Strategy::Vision(backend), timeout());

        let result = analyzer.analyze(&image());
        assert_eq!(result.fallback_reason, Some(FallbackReason::BackendFailure));
    }

    #[test]
    fn test_disabled_uses_no_backend_fallback() {
        let analyzer = PhotoAnalyzer::new(Strategy::Disabled, timeout());
        let a = analyzer.analyze_with_rng(&image(), &mut StdRng::seed_from_u64(8));
        let b = analyzer.analyze_with_rng(&image(), &mut StdRng::seed_from_u64(8));

        assert_eq!(a.fallback_reason, Some(FallbackReason::NoBackend));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_model_success_skips_vision() {
        let (backend, calls) = vision(Outcome::Record(busy_record()));
        let model = StubModel {
            scores: Some(ModelScores { composition: 70.2, focus: 81.0, exposure: 64.5, color: 90.0 }),
        };
        let analyzer = PhotoAnalyzer::new(
            Strategy::CustomModel { model: Box::new(model), vision: Some(backend) },
            timeout(),
        );

        let result = analyzer.analyze(&image());
        assert_eq!(result.method, AnalysisMethod::CustomModel);
        assert_eq!((result.composition, result.exposure), (70, 65));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_custom_model_failure_chains_to_vision() {
        let (backend, calls) = vision(Outcome::Record(busy_record()));
        let analyzer = PhotoAnalyzer::new(
            Strategy::CustomModel { model: Box::new(StubModel { scores: None }), vision: Some(backend) },
            timeout(),
        );

        let result = analyzer.analyze(&image());
        assert_eq!(result.method, AnalysisMethod::Vision);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_model_failure_without_vision() {
        let analyzer = PhotoAnalyzer::new(
            Strategy::CustomModel { model: Box::new(StubModel { scores: None }), vision: None },
            timeout(),
        );

        let result = analyzer.analyze(&image());
        assert_eq!(result.method, AnalysisMethod::Fallback);
        assert_eq!(result.fallback_reason, Some(FallbackReason::BackendFailure));
    }

    #[test]
    fn test_fallback_reason_mapping() {
        assert_eq!(fallback_reason(&DetectionFailure::NotConfigured), FallbackReason::NoBackend);
        assert_eq!(
            fallback_reason(&DetectionFailure::Timeout(Duration::from_secs(1))),
            FallbackReason::Timeout
        );
        assert_eq!(
            fallback_reason(&DetectionFailure::Malformed("x".into())),
            FallbackReason::BackendFailure
        );
    }

    #[test]
    fn test_from_config_selects_strategy() {
        let analyzer = PhotoAnalyzer::from_config(&AnalyzerConfig::default()).unwrap();
        assert_eq!(analyzer.strategy().name(), "disabled");

        let config = AnalyzerConfig {
            vision_api_key: Some("key".into()),
            ..AnalyzerConfig::default()
        };
        let analyzer = PhotoAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.strategy().name(), "vision");

        let config = AnalyzerConfig { use_custom_model: true, ..AnalyzerConfig::default() };
        let analyzer = PhotoAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.strategy().name(), "custom_model");
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PhotoAnalyzer>();

        let analyzer = Arc::new(PhotoAnalyzer::new(Strategy::Disabled, timeout()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = Arc::clone(&analyzer);
                std::thread::spawn(move || analyzer.analyze(&image()).method)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), AnalysisMethod::Fallback);
        }
    }
}
