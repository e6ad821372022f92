// src/clock.rs

/// Milliseconds since the Unix epoch; the source of fresh seeds.
pub fn now_millis() -> i64 {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            js_sys::Date::now() as i64
        } else {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as i64)
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
