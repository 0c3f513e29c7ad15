// Cloud Vision detection backend
// One images:annotate sub-request per feature, issued concurrently and merged.
// A failed sub-request leaves its category empty; only a total failure fails detection.

use std::thread;
use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::record::{
    BoundingBox, DetectedObject, DetectionRecord, DominantColor, Face, ImageSize, Label, Vertex,
};
use super::{DetectionBackend, DetectionFailure, ImageInput};
use crate::constants::{VISION_FEATURES, VISION_MAX_RESULTS};
use crate::error::Result;

// Max characters of an error body kept for logs
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent<'a>,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotations>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImageAnnotations {
    label_annotations: Vec<EntityAnnotation>,
    face_annotations: Vec<FaceAnnotation>,
    localized_object_annotations: Vec<ObjectAnnotation>,
    image_properties_annotation: Option<ImageProperties>,
    logo_annotations: Vec<EntityAnnotation>,
    error: Option<ApiStatus>,
}

impl ImageAnnotations {
    fn absorb(&mut self, other: ImageAnnotations) {
        self.label_annotations.extend(other.label_annotations);
        self.face_annotations.extend(other.face_annotations);
        self.localized_object_annotations.extend(other.localized_object_annotations);
        self.logo_annotations.extend(other.logo_annotations);
        if self.image_properties_annotation.is_none() {
            self.image_properties_annotation = other.image_properties_annotation;
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    description: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceAnnotation {
    bounding_poly: Option<Poly>,
    fd_bounding_poly: Option<Poly>,
    detection_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectAnnotation {
    name: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Poly {
    vertices: Vec<RawVertex>,
    normalized_vertices: Vec<RawVertex>,
}

// Vision omits zero coordinates
#[derive(Debug, Deserialize)]
struct RawVertex {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorInfo {
    color: Option<RgbColor>,
    score: Option<f64>,
    pixel_fraction: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RgbColor {
    red: Option<f64>,
    green: Option<f64>,
    blue: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    code: Option<i32>,
    message: Option<String>,
}

/// Cloud Vision `images:annotate` client
pub struct CloudVisionBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl CloudVisionBackend {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint, api_key))
    }

    /// Use an explicitly constructed HTTP client
    pub fn with_client(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn annotate(&self, content: &str, feature: &str, timeout: Duration) -> std::result::Result<ImageAnnotations, DetectionFailure> {
        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent { content },
                features: [Feature { kind: feature, max_results: VISION_MAX_RESULTS }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| request_failure(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            body.truncate(floor_char_boundary(&body, ERROR_BODY_LIMIT));
            return Err(DetectionFailure::Status { status: status.as_u16(), body });
        }

        let parsed: AnnotateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                DetectionFailure::Timeout(timeout)
            } else {
                DetectionFailure::Malformed(format!("Failed to parse annotate response: {}", e))
            }
        })?;

        let annotations = parsed.responses.into_iter().next().unwrap_or_default();
        if let Some(err) = &annotations.error {
            if err.code.unwrap_or(0) != 0 || err.message.is_some() {
                return Err(DetectionFailure::Request(format!(
                    "Vision error {}: {}",
                    err.code.unwrap_or(0),
                    err.message.as_deref().unwrap_or("unknown")
                )));
            }
        }

        Ok(annotations)
    }
}

impl DetectionBackend for CloudVisionBackend {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn detect(&self, image: &ImageInput, timeout: Duration) -> std::result::Result<DetectionRecord, DetectionFailure> {
        let content = base64::engine::general_purpose::STANDARD.encode(&image.bytes);

        log::debug!(
            "Requesting {} vision features for {} ({} bytes)",
            VISION_FEATURES.len(),
            image.display_name,
            image.bytes.len()
        );

        let results = thread::scope(|s| {
            let handles: Vec<_> = VISION_FEATURES
                .iter()
                .map(|&feature| {
                    let content = content.as_str();
                    (feature, s.spawn(move || self.annotate(content, feature, timeout)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(feature, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(DetectionFailure::Request(format!("{} worker panicked", feature)))
                    });
                    (feature, result)
                })
                .collect::<Vec<_>>()
        });

        merge_feature_results(results, image.dimensions)
    }
}

fn request_failure(err: reqwest::Error, timeout: Duration) -> DetectionFailure {
    if err.is_timeout() {
        DetectionFailure::Timeout(timeout)
    } else {
        DetectionFailure::Request(err.to_string())
    }
}

fn floor_char_boundary(s: &str, limit: usize) -> usize {
    if s.len() <= limit {
        return s.len();
    }
    let mut idx = limit;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Merge per-feature responses, tolerating partial failure
fn merge_feature_results(
    results: Vec<(&'static str, std::result::Result<ImageAnnotations, DetectionFailure>)>,
    image_size: Option<ImageSize>,
) -> std::result::Result<DetectionRecord, DetectionFailure> {
    let mut merged = ImageAnnotations::default();
    let mut failures = Vec::new();
    let mut succeeded = 0;

    for (feature, result) in results {
        match result {
            Ok(annotations) => {
                succeeded += 1;
                merged.absorb(annotations);
            }
            Err(e) => {
                log::warn!("Vision {} request failed: {}", feature, e);
                failures.push(e);
            }
        }
    }

    if succeeded == 0 {
        // Report a timeout in preference to other errors
        let idx = failures.iter().position(|f| f.is_timeout()).unwrap_or(0);
        return Err(if failures.is_empty() {
            DetectionFailure::Malformed("no vision features requested".to_string())
        } else {
            failures.swap_remove(idx)
        });
    }

    Ok(normalize(merged, image_size))
}

/// Convert Vision annotations into the canonical record
fn normalize(annotations: ImageAnnotations, image_size: Option<ImageSize>) -> DetectionRecord {
    let faces = annotations
        .face_annotations
        .into_iter()
        .map(|face| {
            let poly = face.bounding_poly.or(face.fd_bounding_poly).unwrap_or_default();
            let bounding_box = if poly.vertices.is_empty() {
                BoundingBox::normalized(to_vertices(poly.normalized_vertices))
            } else {
                BoundingBox::pixel(to_vertices(poly.vertices))
            };
            Face {
                bounding_box,
                confidence: unit(face.detection_confidence),
            }
        })
        .collect();

    let objects = annotations
        .localized_object_annotations
        .into_iter()
        .map(|obj| DetectedObject {
            name: obj.name.unwrap_or_else(|| "unknown".to_string()),
            confidence: unit(obj.score),
        })
        .collect();

    let labels = annotations
        .label_annotations
        .into_iter()
        .filter_map(|label| {
            Some(Label {
                description: label.description?,
                confidence: unit(label.score),
            })
        })
        .collect();

    let dominant_colors = annotations
        .image_properties_annotation
        .and_then(|props| props.dominant_colors)
        .map(|dc| dc.colors)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|info| {
            let rgb = info.color?;
            Some(DominantColor {
                red: channel(rgb.red),
                green: channel(rgb.green),
                blue: channel(rgb.blue),
                coverage: unit(info.score),
                pixel_fraction: info.pixel_fraction.map(|f| f.clamp(0.0, 1.0)),
            })
        })
        .collect();

    let logos = annotations
        .logo_annotations
        .into_iter()
        .filter_map(|logo| logo.description)
        .collect();

    let mut record = DetectionRecord {
        faces,
        objects,
        labels,
        dominant_colors,
        logos,
        image_size,
    };
    record.sort_colors_by_coverage();
    record
}

fn to_vertices(raw: Vec<RawVertex>) -> Vec<Vertex> {
    raw.into_iter()
        .map(|v| Vertex {
            x: v.x.unwrap_or(0.0),
            y: v.y.unwrap_or(0.0),
        })
        .collect()
}

fn unit(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).clamp(0.0, 1.0)
}

fn channel(value: Option<f64>) -> u8 {
    value.unwrap_or(0.0).round().clamp(0.0, 255.0) as u8
}
