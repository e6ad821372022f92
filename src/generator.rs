// src/generator.rs

use std::f64::consts::PI;

use crate::geometry::{Point2, PolygonShape};
use crate::prng::Mulberry32;

/// Center of the 500x500 drawing canvas.
pub const CANVAS_CENTER: Point2 = Point2 { x: 250.0, y: 250.0 };

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub sides: u32,
    pub base_radius: f64,
    pub variance: f64,
    pub roughness: f64,
    pub seed: u32,
}

pub struct PolygonGenerator;

impl PolygonGenerator {
    pub fn generate(params: &GenerationParams) -> PolygonShape {
        Self::generate_around(CANVAS_CENTER, params)
    }

    /// Places `params.sides` vertices around `center`.
    ///
    /// Each vertex consumes exactly three draws, in this order: radius
    /// jitter, x roughness, y roughness. Reordering them changes every shape
    /// a given seed produces.
    pub fn generate_around(center: Point2, params: &GenerationParams) -> PolygonShape {
        let mut rand = Mulberry32::new(params.seed);
        let angle_step = (PI * 2.0) / params.sides as f64;

        let mut points = Vec::with_capacity(params.sides as usize);
        for i in 0..params.sides {
            let angle = i as f64 * angle_step;
            let r = params.base_radius + rand.next_f64() * params.variance - params.variance / 2.0;
            let x = angle.cos() * r + params.roughness * (rand.next_f64() - 0.5);
            let y = angle.sin() * r + params.roughness * (rand.next_f64() - 0.5);
            points.push(Point2::new(x + center.x, y + center.y));
        }

        log::debug!(
            "generated {} vertices (seed {}, variance {}, roughness {})",
            points.len(),
            params.seed,
            params.variance,
            params.roughness
        );
        PolygonShape::from_points(points)
    }
}

pub fn generate(sides: u32, base_radius: f64, variance: f64, roughness: f64, seed: u32) -> PolygonShape {
    PolygonGenerator::generate(&GenerationParams {
        sides,
        base_radius,
        variance,
        roughness,
        seed,
    })
}
