// src/session.rs

use rand::Rng;

use crate::clock::now_millis;
use crate::color::HexColor;
use crate::config::AppConfig;
use crate::error::{ExportError, ShareError};
use crate::export;
use crate::generator::PolygonGenerator;
use crate::geometry::PolygonShape;
use crate::state_codec::{has_shared_params, ShareableState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Loaded from a link; the seed stays fixed while editing.
    Shared,
    /// Rolled locally; every geometry edit draws a new seed from the clock.
    Fresh,
}

/// Editor state behind the controls: current parameters plus the shape they
/// produce. All UI surfaces go through this.
pub struct Session {
    config: AppConfig,
    state: ShareableState,
    origin: SessionOrigin,
    shape: PolygonShape,
    seed_source: fn() -> i64,
}

impl Session {
    /// Loads shared state when `query` carries any recognized key, otherwise
    /// starts from a random roll.
    pub fn from_query<R: Rng + ?Sized>(query: &str, config: AppConfig, rng: &mut R) -> Self {
        Self::from_query_with_seed_source(query, config, rng, now_millis)
    }

    pub fn from_query_with_seed_source<R: Rng + ?Sized>(
        query: &str,
        config: AppConfig,
        rng: &mut R,
        seed_source: fn() -> i64,
    ) -> Self {
        let (state, origin) = if has_shared_params(query) {
            let state = ShareableState::decode_with_fallback_seed(query, seed_source);
            log::info!("loaded shared state: {}", state.encode());
            (state, SessionOrigin::Shared)
        } else {
            let state = ShareableState::random(rng, &config.randomize, seed_source());
            log::info!("no shared state, rolled: {}", state.encode());
            (state, SessionOrigin::Fresh)
        };

        let mut session = Self {
            config,
            state,
            origin,
            shape: PolygonShape::default(),
            seed_source,
        };
        session.clamp_to_controls();
        session.regenerate();
        session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &ShareableState {
        &self.state
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn shape(&self) -> &PolygonShape {
        &self.shape
    }

    pub fn set_sides(&mut self, sides: u32) {
        self.state.sides = sides;
        self.geometry_changed();
    }

    pub fn set_variance(&mut self, variance: f64) {
        self.state.variance = variance;
        self.geometry_changed();
    }

    pub fn set_roughness(&mut self, roughness: f64) {
        self.state.roughness = roughness;
        self.geometry_changed();
    }

    pub fn set_fill(&mut self, color: HexColor) {
        self.state.color = color;
    }

    pub fn set_background(&mut self, color: HexColor) {
        self.state.bg = color;
    }

    /// Applies typed hex input; returns false and leaves the color alone when
    /// the text is not a complete six-digit color.
    pub fn set_fill_hex(&mut self, text: &str) -> bool {
        match HexColor::parse(text) {
            Some(color) => {
                self.set_fill(color);
                true
            }
            None => false,
        }
    }

    pub fn set_background_hex(&mut self, text: &str) -> bool {
        match HexColor::parse(text) {
            Some(color) => {
                self.set_background(color);
                true
            }
            None => false,
        }
    }

    /// New random parameters, colors and seed.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state = ShareableState::random(rng, &self.config.randomize, (self.seed_source)());
        log::debug!("randomized: {}", self.state.encode());
        self.regenerate();
    }

    pub fn title_color(&self) -> HexColor {
        self.state.bg.contrasting_title()
    }

    pub fn share_link(&self, base: &str) -> Result<String, ShareError> {
        self.state.share_url(base)
    }

    pub fn export_svg(&self) -> Result<String, ExportError> {
        export::render_svg(&self.shape, self.state.color, self.config.export.padding)
    }

    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        export::render_png(&self.shape, self.state.color, &self.config.export)
    }

    /// Pulls geometry values into the ranges the controls can show. Links
    /// may carry anything; the generator only ever sees these bounds.
    fn clamp_to_controls(&mut self) {
        let (sides, variance, roughness) = (
            &self.config.sides_range,
            &self.config.variance_range,
            &self.config.roughness_range,
        );
        let clamped = (
            self.state.sides.clamp(*sides.start(), *sides.end()),
            self.state.variance.clamp(*variance.start(), *variance.end()),
            self.state.roughness.clamp(*roughness.start(), *roughness.end()),
        );
        if clamped != (self.state.sides, self.state.variance, self.state.roughness) {
            log::info!(
                "clamped sides/variance/roughness {}/{}/{} to {}/{}/{}",
                self.state.sides,
                self.state.variance,
                self.state.roughness,
                clamped.0,
                clamped.1,
                clamped.2
            );
            (self.state.sides, self.state.variance, self.state.roughness) = clamped;
        }
    }

    fn geometry_changed(&mut self) {
        self.clamp_to_controls();
        if self.origin == SessionOrigin::Fresh {
            self.state.seed = (self.seed_source)();
        }
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let params = self.state.generation_params(self.config.base_radius);
        self.shape = PolygonGenerator::generate(&params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicI64, Ordering};

    static TICKS: AtomicI64 = AtomicI64::new(1_000);

    fn ticking_clock() -> i64 {
        TICKS.fetch_add(1, Ordering::SeqCst)
    }

    fn fixed_clock() -> i64 {
        555
    }

    #[test]
    fn shared_query_is_loaded_verbatim() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = Session::from_query_with_seed_source(
            "sides=4&variance=0&roughness=0&color=112233&bg=000000&seed=1",
            AppConfig::default(),
            &mut rng,
            fixed_clock,
        );
        assert_eq!(session.origin(), SessionOrigin::Shared);
        assert_eq!(session.state().seed, 1);
        assert_eq!(session.state().color, HexColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(session.shape().len(), 4);
        assert!((session.shape().points()[0].x - 350.0).abs() < 1e-9);
        assert_eq!(session.title_color(), HexColor::TITLE_ON_DARK);
    }

    #[test]
    fn out_of_range_link_values_are_clamped_on_load() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = Session::from_query_with_seed_source(
            "sides=4294967295&variance=1e9&roughness=-5&seed=1",
            AppConfig::default(),
            &mut rng,
            fixed_clock,
        );
        assert_eq!(session.origin(), SessionOrigin::Shared);
        assert_eq!(session.state().sides, 20);
        assert_eq!(session.state().variance, 100.0);
        assert_eq!(session.state().roughness, 0.0);
        assert_eq!(session.shape().len(), 20);

        let link = session.share_link("https://rocks.example/").unwrap();
        assert!(link.contains("sides=20&variance=100&roughness=0&"), "{link}");

        let mut rng = StdRng::seed_from_u64(1);
        let tiny = Session::from_query_with_seed_source("sides=0&seed=1", AppConfig::default(), &mut rng, fixed_clock);
        assert_eq!(tiny.state().sides, 3);
        assert_eq!(tiny.shape().len(), 3);
    }

    #[test]
    fn setters_stay_within_control_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::from_query_with_seed_source("seed=1", AppConfig::default(), &mut rng, fixed_clock);
        session.set_sides(u32::MAX);
        session.set_roughness(75.0);
        assert_eq!(session.state().sides, 20);
        assert_eq!(session.state().roughness, 50.0);
        assert_eq!(session.shape().len(), 20);
    }

    #[test]
    fn seed_only_query_uses_defaults_for_the_rest() {
        let mut rng = StdRng::seed_from_u64(1);
        let session =
            Session::from_query_with_seed_source("seed=42", AppConfig::default(), &mut rng, fixed_clock);
        assert_eq!(session.origin(), SessionOrigin::Shared);
        assert_eq!(session.state(), &ShareableState::with_seed(42));
    }

    #[test]
    fn empty_query_rolls_fresh_state() {
        let mut rng = StdRng::seed_from_u64(9);
        let session = Session::from_query_with_seed_source("", AppConfig::default(), &mut rng, fixed_clock);
        assert_eq!(session.origin(), SessionOrigin::Fresh);
        assert_eq!(session.state().seed, 555);
        assert!((3..=12).contains(&session.state().sides));
        assert_eq!(session.shape().len(), session.state().sides as usize);
    }

    #[test]
    fn shared_sessions_keep_their_seed_while_editing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session =
            Session::from_query_with_seed_source("seed=77", AppConfig::default(), &mut rng, ticking_clock);
        session.set_sides(8);
        session.set_variance(50.0);
        assert_eq!(session.state().seed, 77);
        assert_eq!(session.shape().len(), 8);
    }

    #[test]
    fn fresh_sessions_reseed_on_geometry_edits_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::from_query_with_seed_source("", AppConfig::default(), &mut rng, ticking_clock);
        let before = session.state().seed;
        session.set_roughness(20.0);
        let after_geometry = session.state().seed;
        assert_ne!(before, after_geometry);

        let shape = session.shape().clone();
        session.set_fill(HexColor::rgb(1, 2, 3));
        session.set_background(HexColor::rgb(4, 5, 6));
        assert_eq!(session.state().seed, after_geometry);
        assert_eq!(session.shape(), &shape);
    }

    #[test]
    fn hex_input_only_applies_complete_colors() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = Session::from_query_with_seed_source("seed=1", AppConfig::default(), &mut rng, fixed_clock);
        assert!(!session.set_fill_hex("12"));
        assert_eq!(session.state().color, HexColor::DEFAULT_FILL);
        assert!(session.set_fill_hex(" #a1b2c3"));
        assert_eq!(session.state().color, HexColor::rgb(0xA1, 0xB2, 0xC3));
        assert!(session.set_background_hex("000000"));
        assert_eq!(session.title_color(), HexColor::TITLE_ON_DARK);
    }

    #[test]
    fn share_link_reproduces_the_session() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::from_query_with_seed_source("", AppConfig::default(), &mut rng, fixed_clock);
        let link = session.share_link("https://rocks.example/").unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let reopened = Session::from_query_with_seed_source(&link, AppConfig::default(), &mut rng, ticking_clock);
        assert_eq!(reopened.origin(), SessionOrigin::Shared);
        assert_eq!(reopened.state(), session.state());
        assert_eq!(reopened.shape(), session.shape());
    }

    #[test]
    fn exports_use_configured_framing() {
        let mut rng = StdRng::seed_from_u64(7);
        let session = Session::from_query_with_seed_source(
            "sides=4&variance=0&roughness=0&seed=1",
            AppConfig::default(),
            &mut rng,
            fixed_clock,
        );
        let svg = session.export_svg().unwrap();
        assert!(svg.contains(r#"width="220" height="220""#), "{svg}");
        let png = session.export_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
