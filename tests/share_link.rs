// tests/share_link.rs
//
// Share links end to end through the public API: a link produced by one
// session reopens as the same shape in another.

use rand::rngs::StdRng;
use rand::SeedableRng;

use rockgen::{generate, has_shared_params, AppConfig, HexColor, Session, SessionOrigin, ShareableState};

const BASE: &str = "https://rocks.example/app/?theme=dark#controls";

fn fixed_clock() -> i64 {
    1_718_000_000_000
}

fn session(query: &str, seed: u64) -> Session {
    Session::from_query_with_seed_source(query, AppConfig::default(), &mut StdRng::seed_from_u64(seed), fixed_clock)
}

#[test]
fn shared_link_reopens_identical_shape() {
    let mut first = session("", 11);
    first.set_sides(9);
    first.set_fill(HexColor::rgb(0x22, 0x88, 0x44));
    let link = first.share_link(BASE).unwrap();

    assert!(link.starts_with("https://rocks.example/app/?theme=dark&"));
    assert!(!link.contains('#'));

    let reopened = session(&link, 99);
    assert_eq!(reopened.origin(), SessionOrigin::Shared);
    assert_eq!(reopened.state(), first.state());
    assert_eq!(reopened.shape(), first.shape());
}

#[test]
fn decode_accepts_link_query_and_bare_forms() {
    let state = ShareableState {
        sides: 5,
        variance: 12.5,
        roughness: 3.0,
        color: HexColor::rgb(0x10, 0x20, 0x30),
        bg: HexColor::DEFAULT_BACKGROUND,
        seed: 1234,
    };
    let link = state.share_url(BASE).unwrap();
    let query = state.encode();

    assert_eq!(ShareableState::decode(&link), state);
    assert_eq!(ShareableState::decode(&query), state);
    assert_eq!(ShareableState::decode(&format!("?{query}")), state);
}

#[test]
fn presence_of_any_key_marks_a_shared_session() {
    assert!(has_shared_params("?bg=000000"));
    assert!(has_shared_params("seed=garbage"));
    assert!(!has_shared_params("?theme=dark"));
    assert!(!has_shared_params(""));

    let partial = session("?seed=42", 3);
    assert_eq!(partial.origin(), SessionOrigin::Shared);
    assert_eq!(partial.state().sides, ShareableState::DEFAULT_SIDES);
    assert_eq!(partial.state().seed, 42);
}

#[test]
fn shared_session_matches_free_generator() {
    let s = session("sides=3&variance=30&roughness=10&seed=42", 0);
    assert_eq!(s.shape(), &generate(3, 100.0, 30.0, 10.0, 42));

    let square = session("sides=4&variance=0&roughness=0&seed=1", 0);
    let pts = square.shape().points();
    assert_eq!(pts.len(), 4);
    assert!((pts[0].x - 350.0).abs() < 1e-9 && (pts[0].y - 250.0).abs() < 1e-9);
    assert!((pts[2].x - 150.0).abs() < 1e-9 && (pts[2].y - 250.0).abs() < 1e-9);
}

#[test]
fn exports_from_a_shared_link() {
    let s = session("sides=6&variance=0&roughness=0&color=3366CC&seed=5", 0);
    let svg = s.export_svg().unwrap();
    assert!(svg.contains("fill=\"#3366CC\""));

    let png = s.export_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    let (w, h) = decoded.dimensions();
    let center = decoded.get_pixel(w / 2, h / 2);
    assert_eq!(center.0, [0x33, 0x66, 0xCC, 0xFF]);
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
}
