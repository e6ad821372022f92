// src/config.rs

use std::ops::RangeInclusive;

/// Bounds used when rolling a fresh shape.
#[derive(Debug, Clone)]
pub struct RandomizeConfig {
    pub sides: RangeInclusive<u32>,
    /// Exclusive upper bound; variance is drawn as a whole number.
    pub variance_limit: u32,
    /// Exclusive upper bound; roughness is drawn as a whole number.
    pub roughness_limit: u32,
}

impl Default for RandomizeConfig {
    fn default() -> Self {
        Self {
            sides: 3..=12,
            variance_limit: 100,
            roughness_limit: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Blank margin around the shape's bounding box, in canvas units.
    pub padding: f64,
    /// Output pixels per canvas unit for PNG export.
    pub png_scale: f64,
    /// Coverage samples per pixel axis when rasterizing.
    pub supersample: u32,
    /// Upper bound on either PNG dimension.
    pub max_png_side: u32,
    pub svg_file_name: String,
    pub png_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            png_scale: 4.0,
            supersample: 4,
            max_png_side: 16_384,
            svg_file_name: "polygon.svg".to_string(),
            png_file_name: "polygon.png".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Side of the square canvas the generator draws into.
    pub canvas_size: f64,
    pub base_radius: f64,

    pub sides_range: RangeInclusive<u32>,
    pub variance_range: RangeInclusive<f64>,
    pub roughness_range: RangeInclusive<f64>,

    pub copy_feedback_secs: f64,
    pub share_base_url: String,

    pub randomize: RandomizeConfig,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Rock Generator".to_string(),
            window_width: 1024,
            window_height: 768,
            canvas_size: 500.0,
            base_radius: 100.0,
            sides_range: 3..=20,
            variance_range: 0.0..=100.0,
            roughness_range: 0.0..=50.0,
            copy_feedback_secs: 2.0,
            share_base_url: "http://localhost:8080/".to_string(),
            randomize: RandomizeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}
