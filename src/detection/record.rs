// Canonical detection record consumed by the scoring engine
// Every field may be empty; scoring treats missing data as "no signal".

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the analyzed image, when the caller knows them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Coordinate space a bounding box's vertices are expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Fractions of image extent in [0, 1]
    #[default]
    Normalized,
    /// Absolute pixel coordinates
    Pixel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub space: CoordinateSpace,
}

impl BoundingBox {
    pub fn normalized(vertices: Vec<Vertex>) -> Self {
        Self { vertices, space: CoordinateSpace::Normalized }
    }

    pub fn pixel(vertices: Vec<Vertex>) -> Self {
        Self { vertices, space: CoordinateSpace::Pixel }
    }

    /// Center of the box as a fraction of image extent (x, y).
    /// Pixel boxes need the image size; without it the center is unknown.
    pub fn center_fraction(&self, image_size: Option<ImageSize>) -> Option<(f64, f64)> {
        let first = self.vertices.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for v in &self.vertices[1..] {
            min_x = min_x.min(v.x);
            max_x = max_x.max(v.x);
            min_y = min_y.min(v.y);
            max_y = max_y.max(v.y);
        }

        let cx = (min_x + max_x) / 2.0;
        let cy = (min_y + max_y) / 2.0;

        match self.space {
            CoordinateSpace::Normalized => Some((cx, cy)),
            CoordinateSpace::Pixel => {
                let size = image_size?;
                if size.width == 0 || size.height == 0 {
                    return None;
                }
                Some((cx / size.width as f64, cy / size.height as f64))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub description: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Backend color score, used as the coverage fraction
    #[serde(default)]
    pub coverage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_fraction: Option<f64>,
}

impl DominantColor {
    pub fn new(red: u8, green: u8, blue: u8, coverage: f64) -> Self {
        Self { red, green, blue, coverage, pixel_fraction: None }
    }

    /// Unweighted mean of the three channels
    pub fn brightness(&self) -> f64 {
        self.channel_sum() as f64 / 3.0
    }

    pub fn channel_sum(&self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }
}

/// Normalized output of a detection backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub dominant_colors: Vec<DominantColor>,
    #[serde(default)]
    pub logos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl DetectionRecord {
    /// True when the backend returned nothing scoreable
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
            && self.objects.is_empty()
            && self.labels.is_empty()
            && self.dominant_colors.is_empty()
    }

    pub fn mean_object_confidence(&self) -> Option<f64> {
        if self.objects.is_empty() {
            return None;
        }
        let total: f64 = self.objects.iter().map(|o| o.confidence).sum();
        Some(total / self.objects.len() as f64)
    }

    /// Sort dominant colors by descending coverage (stable for ties)
    pub fn sort_colors_by_coverage(&mut self) {
        self.dominant_colors
            .sort_by(|a, b| b.coverage.total_cmp(&a.coverage));
    }
}
