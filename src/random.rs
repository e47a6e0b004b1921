/// Id generation and the small amount of randomness the dashboard needs
use uuid::Uuid;

/// Generate an id that `is_taken` does not already know about
pub fn unique_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !is_taken(&id) {
            return id;
        }
        log::debug!("Generated id {} collided, retrying", id);
    }
}

fn random_u32() -> u32 {
    let mut buf = [0u8; 4];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf),
        Err(e) => {
            log::warn!("getrandom failed, using clock: {}", e);
            chrono::Utc::now().timestamp_subsec_nanos()
        }
    }
}

/// Uniform-ish integer in `min..=max`
pub fn random_range(min: u32, max: u32) -> u32 {
    debug_assert!(min <= max);
    min + random_u32() % (max - min + 1)
}

/// Float in `[0, 1]`
pub fn random_unit() -> f64 {
    random_u32() as f64 / u32::MAX as f64
}

/// Random pastel color: any hue, saturation 60-70%, lightness 65-70%
pub fn pastel_color() -> String {
    format!(
        "hsl({}, {}%, {}%)",
        random_range(0, 359),
        random_range(60, 70),
        random_range(65, 70)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn test_unique_id_skips_taken() {
        let first = unique_id(|_| false);
        let second = unique_id(|id| id == first);

        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn test_unique_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..200).map(|_| unique_id(|_| false)).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_random_range_bounds() {
        for _ in 0..500 {
            let n = random_range(60, 70);
            assert!((60..=70).contains(&n));
        }
        assert_eq!(random_range(5, 5), 5);
    }

    #[test]
    fn test_pastel_color_format() {
        let re = Regex::new(r"^hsl\((\d+), (\d+)%, (\d+)%\)$").unwrap();
        for _ in 0..100 {
            let color = pastel_color();
            let caps = re.captures(&color).unwrap();
            let hue: u32 = caps[1].parse().unwrap();
            let saturation: u32 = caps[2].parse().unwrap();
            let lightness: u32 = caps[3].parse().unwrap();

            assert!(hue < 360);
            assert!((60..=70).contains(&saturation));
            assert!((65..=70).contains(&lightness));
        }
    }
}
