//! Location cleanup ahead of geocoding.
//!
//! Profile locations often carry words like "Greater ... Area" or
//! "... Metropolitan Region" that throw off the geocoder. They are deleted
//! outright (not replaced by a separator) after lowercasing.

/// Removed in this order, with plain substring replacement.
pub const NOISE_SUBSTRINGS: [&str; 4] = ["region", "greater", "area", "metropolitan"];

/// Lowercases `location`, deletes every noise substring and trims the result.
///
/// Never fails: `None` stays `None` and an empty string stays empty.
pub fn normalize_location(location: Option<&str>) -> Option<String> {
    let mut cleaned = location?.to_lowercase();
    for noise in NOISE_SUBSTRINGS {
        cleaned = cleaned.replace(noise, "");
    }
    Some(cleaned.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_noise_words() {
        assert_eq!(
            normalize_location(Some("Greater London Area")).as_deref(),
            Some("london")
        );
        assert_eq!(
            normalize_location(Some("São Paulo Metropolitan Region")).as_deref(),
            Some("são paulo")
        );
    }

    #[test]
    fn test_deletes_inside_words_and_keeps_inner_spacing() {
        assert_eq!(
            normalize_location(Some("San Francisco Bay Area")).as_deref(),
            Some("san francisco bay")
        );
        assert_eq!(
            normalize_location(Some("Paris, France")).as_deref(),
            Some("paris, france")
        );
        assert_eq!(
            normalize_location(Some("AREAREGION Berlin")).as_deref(),
            Some("berlin")
        );
    }

    #[test]
    fn test_absent_and_empty_inputs() {
        assert_eq!(normalize_location(None), None);
        assert_eq!(normalize_location(Some("")).as_deref(), Some(""));
        assert_eq!(normalize_location(Some("  Area  ")).as_deref(), Some(""));
    }

    #[test]
    fn test_output_never_contains_noise_or_outer_whitespace() {
        let samples = [
            " Greater Boston Area ",
            "RÉGION Île-de-France",
            "Metropolitan Area of Lisbon",
            "gREATER mANCHESTER",
            "Randstad region\t",
            "already clean",
        ];

        for sample in samples {
            let cleaned = normalize_location(Some(sample)).unwrap();
            for noise in NOISE_SUBSTRINGS {
                assert!(!cleaned.contains(noise), "{:?} -> {:?}", sample, cleaned);
            }
            assert_eq!(cleaned, cleaned.trim());
        }
    }
}
