// src/geometry.rs

use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, TessellationError, VertexBuffers};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Grows the box by `padding` on every side.
    pub fn padded(&self, padding: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - padding, self.min.y - padding),
            max: Point2::new(self.max.x + padding, self.max.y + padding),
        }
    }
}

/// Closed outline, vertices in drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonShape {
    points: Vec<Point2>,
}

impl PolygonShape {
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.points.first()?;
        let mut bbox = BoundingBox { min: first, max: first };
        for p in &self.points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    /// Shoelace area; positive for counter-clockwise outlines in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        let count = self.points.len();
        if count < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..count {
            let j = (i + 1) % count;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Value for an SVG `points` attribute: `x,y` pairs separated by spaces.
    pub fn svg_points(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Triangles covering the outline under the non-zero fill rule, the same
    /// rule the SVG and PNG exports use. Crossing edges get extra vertices.
    pub fn tessellate(&self) -> Result<FillMesh, TessellationError> {
        let Some((first, rest)) = self.points.split_first() else {
            return Ok(FillMesh::default());
        };
        if rest.len() < 2 {
            return Ok(FillMesh::default());
        }

        let mut builder = Path::builder();
        builder.begin(point(first.x as f32, first.y as f32));
        for p in rest {
            builder.line_to(point(p.x as f32, p.y as f32));
        }
        builder.end(true);
        let path = builder.build();

        let mut buffers: VertexBuffers<Point2, u32> = VertexBuffers::new();
        FillTessellator::new().tessellate_path(
            &path,
            &FillOptions::non_zero(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                let p = vertex.position();
                Point2::new(p.x as f64, p.y as f64)
            }),
        )?;

        Ok(FillMesh {
            vertices: buffers.vertices,
            indices: buffers.indices,
        })
    }
}

/// Indexed triangle list, three indices per triangle.
#[derive(Clone, Debug, Default)]
pub struct FillMesh {
    pub vertices: Vec<Point2>,
    pub indices: Vec<u32>,
}

impl FillMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Total area of the triangles. Non-zero fill never overlaps them.
    pub fn area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| self.vertices[i as usize]);
                ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() / 2.0
            })
            .sum()
    }
}
