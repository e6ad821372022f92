// src/lib.rs

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod prng;
pub mod session;
pub mod state_codec;

pub use color::HexColor;
pub use config::AppConfig;
pub use error::{ExportError, ShareError};
pub use generator::{generate, GenerationParams, PolygonGenerator, CANVAS_CENTER};
pub use geometry::{BoundingBox, FillMesh, Point2, PolygonShape};
pub use prng::Mulberry32;
pub use session::{Session, SessionOrigin};
pub use state_codec::{has_shared_params, ShareableState};
