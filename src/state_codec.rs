// src/state_codec.rs

use rand::Rng;
use url::form_urlencoded::{self, Serializer, Target};
use url::Url;

use crate::clock::now_millis;
use crate::color::HexColor;
use crate::config::RandomizeConfig;
use crate::error::ShareError;
use crate::generator::GenerationParams;

pub const KEY_SIDES: &str = "sides";
pub const KEY_VARIANCE: &str = "variance";
pub const KEY_ROUGHNESS: &str = "roughness";
pub const KEY_COLOR: &str = "color";
pub const KEY_BG: &str = "bg";
pub const KEY_SEED: &str = "seed";

pub const RECOGNIZED_KEYS: [&str; 6] = [KEY_SIDES, KEY_VARIANCE, KEY_ROUGHNESS, KEY_COLOR, KEY_BG, KEY_SEED];

/// Everything a share link carries.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareableState {
    pub sides: u32,
    pub variance: f64,
    pub roughness: f64,
    pub color: HexColor,
    pub bg: HexColor,
    /// Full-width seed as stored in links; the generator sees its low 32 bits.
    pub seed: i64,
}

impl ShareableState {
    pub const DEFAULT_SIDES: u32 = 6;
    pub const DEFAULT_VARIANCE: f64 = 30.0;
    pub const DEFAULT_ROUGHNESS: f64 = 10.0;

    pub fn with_seed(seed: i64) -> Self {
        Self {
            sides: Self::DEFAULT_SIDES,
            variance: Self::DEFAULT_VARIANCE,
            roughness: Self::DEFAULT_ROUGHNESS,
            color: HexColor::DEFAULT_FILL,
            bg: HexColor::DEFAULT_BACKGROUND,
            seed,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, ranges: &RandomizeConfig, seed: i64) -> Self {
        Self {
            sides: rng.gen_range(ranges.sides.clone()),
            variance: rng.gen_range(0..ranges.variance_limit.max(1)) as f64,
            roughness: rng.gen_range(0..ranges.roughness_limit.max(1)) as f64,
            color: HexColor::random(rng),
            bg: HexColor::random(rng),
            seed,
        }
    }

    pub fn generation_params(&self, base_radius: f64) -> GenerationParams {
        GenerationParams {
            sides: self.sides,
            base_radius,
            variance: self.variance,
            roughness: self.roughness,
            seed: self.seed as u32,
        }
    }

    /// Query string without the leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = Serializer::new(String::new());
        self.append_pairs(&mut serializer);
        serializer.finish()
    }

    /// Never fails: absent or unparseable fields take their defaults and a
    /// missing seed comes from the clock.
    pub fn decode(query: &str) -> Self {
        Self::decode_with_fallback_seed(query, now_millis)
    }

    pub fn decode_with_fallback_seed(query: &str, fallback_seed: impl FnOnce() -> i64) -> Self {
        let pairs = query_pairs(query);

        let sides = field(&pairs, KEY_SIDES, |v| v.parse::<u32>().ok()).unwrap_or(Self::DEFAULT_SIDES);
        let variance = field(&pairs, KEY_VARIANCE, parse_finite).unwrap_or(Self::DEFAULT_VARIANCE);
        let roughness = field(&pairs, KEY_ROUGHNESS, parse_finite).unwrap_or(Self::DEFAULT_ROUGHNESS);
        let color = field(&pairs, KEY_COLOR, HexColor::parse).unwrap_or(HexColor::DEFAULT_FILL);
        let bg = field(&pairs, KEY_BG, HexColor::parse).unwrap_or(HexColor::DEFAULT_BACKGROUND);
        let seed = field(&pairs, KEY_SEED, |v| v.parse::<i64>().ok()).unwrap_or_else(fallback_seed);

        Self {
            sides,
            variance,
            roughness,
            color,
            bg,
            seed,
        }
    }

    /// `base` with this state written into its query. Unrelated query
    /// parameters on `base` are kept; fragments are dropped.
    pub fn share_url(&self, base: &str) -> Result<String, ShareError> {
        let mut url = Url::parse(base.trim())?;
        let foreign: Vec<(String, String)> = url
            .query_pairs()
            .into_owned()
            .filter(|(key, _)| !RECOGNIZED_KEYS.contains(&key.as_str()))
            .collect();
        url.set_fragment(None);
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(foreign);
            self.append_pairs(&mut query);
        }
        Ok(url.into())
    }

    fn append_pairs<T: Target>(&self, serializer: &mut Serializer<'_, T>) {
        serializer
            .append_pair(KEY_SIDES, &self.sides.to_string())
            .append_pair(KEY_VARIANCE, &self.variance.to_string())
            .append_pair(KEY_ROUGHNESS, &self.roughness.to_string())
            .append_pair(KEY_COLOR, &self.color.to_hex())
            .append_pair(KEY_BG, &self.bg.to_hex())
            .append_pair(KEY_SEED, &self.seed.to_string());
    }
}

/// True when any recognized key is present, whatever its value.
pub fn has_shared_params(query: &str) -> bool {
    query_pairs(query)
        .iter()
        .any(|(key, _)| RECOGNIZED_KEYS.contains(&key.as_str()))
}

/// Accepts a bare query (`a=1&b=2`), one with a leading `?`, or a full URL.
fn query_pairs(input: &str) -> Vec<(String, String)> {
    let input = input.trim();
    let query = match Url::parse(input) {
        Ok(url) => url.query().unwrap_or_default().to_owned(),
        Err(_) => {
            let bare = input.strip_prefix('?').unwrap_or(input);
            bare.split('#').next().unwrap_or_default().to_owned()
        }
    };
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// First occurrence of `key`, parsed. Later duplicates are ignored.
fn field<T>(pairs: &[(String, String)], key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let (_, raw) = pairs.iter().find(|(k, _)| k == key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        log::debug!("ignoring unparseable {key}={raw:?}, using default");
    }
    parsed
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> ShareableState {
        ShareableState {
            sides: 9,
            variance: 42.5,
            roughness: 0.125,
            color: HexColor::rgb(0x12, 0xAB, 0xEF),
            bg: HexColor::rgb(0, 0, 0),
            seed: 1_718_000_000_123,
        }
    }

    #[test]
    fn encode_uses_fixed_keys_without_hash() {
        let encoded = ShareableState::with_seed(7).encode();
        assert_eq!(encoded, "sides=6&variance=30&roughness=10&color=FF5733&bg=FFFFFF&seed=7");
    }

    #[test]
    fn round_trip() {
        let state = sample();
        assert_eq!(ShareableState::decode(&state.encode()), state);

        let zeros = ShareableState {
            sides: 3,
            variance: 0.0,
            roughness: 0.0,
            seed: -12,
            ..sample()
        };
        assert_eq!(ShareableState::decode(&zeros.encode()), zeros);
    }

    #[test]
    fn empty_query_yields_defaults_and_clock_seed() {
        let before = now_millis();
        let state = ShareableState::decode("");
        let after = now_millis();
        assert_eq!(state.sides, 6);
        assert_eq!(state.variance, 30.0);
        assert_eq!(state.roughness, 10.0);
        assert_eq!(state.color.to_string(), "#FF5733");
        assert_eq!(state.bg.to_string(), "#FFFFFF");
        assert!(state.seed > 0);
        assert!(state.seed >= before && state.seed <= after);
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let state = ShareableState::decode_with_fallback_seed(
            "sides=abc&variance=NaN&roughness=12.5&color=XYZ&bg=00ff00&seed=1e3",
            || 99,
        );
        assert_eq!(state.sides, 6);
        assert_eq!(state.variance, 30.0);
        assert_eq!(state.roughness, 12.5);
        assert_eq!(state.color, HexColor::DEFAULT_FILL);
        assert_eq!(state.bg, HexColor::rgb(0, 0xFF, 0));
        assert_eq!(state.seed, 99);

        let inf = ShareableState::decode_with_fallback_seed("variance=inf&sides=-4", || 1);
        assert_eq!(inf.variance, 30.0);
        assert_eq!(inf.sides, 6);
    }

    #[test]
    fn accepts_full_urls_and_leading_question_mark() {
        let from_url = ShareableState::decode_with_fallback_seed(
            "https://example.com/rocks/?sides=4&seed=42#top",
            || 0,
        );
        assert_eq!(from_url.sides, 4);
        assert_eq!(from_url.seed, 42);

        let from_search = ShareableState::decode_with_fallback_seed("?sides=5&color=%23ABCDEF", || 0);
        assert_eq!(from_search.sides, 5);
        assert_eq!(from_search.color, HexColor::rgb(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn first_duplicate_wins() {
        let state = ShareableState::decode_with_fallback_seed("sides=4&sides=8", || 0);
        assert_eq!(state.sides, 4);
    }

    #[test]
    fn presence_detection() {
        assert!(has_shared_params("seed=42"));
        assert!(has_shared_params("?bg="));
        assert!(has_shared_params("utm=x&roughness=oops"));
        assert!(!has_shared_params(""));
        assert!(!has_shared_params("?utm_source=mail&Sides=3"));
    }

    #[test]
    fn share_url_keeps_foreign_params() {
        let url = sample()
            .share_url("https://example.com/app/?theme=dark&sides=3#frag")
            .unwrap();
        assert_eq!(
            url,
            "https://example.com/app/?theme=dark&sides=9&variance=42.5&roughness=0.125&color=12ABEF&bg=000000&seed=1718000000123"
        );
        assert!(matches!(sample().share_url("not a url"), Err(ShareError::InvalidBase(_))));
    }

    #[test]
    fn generation_params_truncate_seed() {
        let params = sample().generation_params(100.0);
        assert_eq!(params.seed, (1_718_000_000_123_i64 as u64 & 0xFFFF_FFFF) as u32);
        assert_eq!(params.sides, 9);
        assert_eq!(params.base_radius, 100.0);
    }

    #[test]
    fn random_state_respects_ranges() {
        let ranges = RandomizeConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let state = ShareableState::random(&mut rng, &ranges, 5);
            assert!((3..=12).contains(&state.sides));
            assert!((0.0..100.0).contains(&state.variance));
            assert!((0.0..50.0).contains(&state.roughness));
            assert_eq!(state.variance.fract(), 0.0);
            assert_eq!(state.seed, 5);
        }
    }
}
