use giveaway_bot::utils::datetime::{format_moscow, parse_moscow_datetime};
use giveaway_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    // Channel handle validation tests
    #[test]
    fn test_valid_channel_handles() {
        let valid_handles = vec![
            "@abcde",
            "@example_channel",
            "@Channel_2025",
            "@_____",
            "  @padded_handle  ",
        ];

        for handle in valid_handles {
            assert!(validate_channel_handle(handle).is_ok(), "Should accept handle: {}", handle);
        }
    }

    #[test]
    fn test_invalid_channel_handles() {
        let invalid_handles = vec![
            "",
            "@",
            "@abcd",               // Too short
            "example_channel",     // Missing @
            "@@example",
            "@example channel",
            "@example-channel",
            "@канал_тест",
            "t.me/example_channel",
        ];

        for handle in invalid_handles {
            assert!(validate_channel_handle(handle).is_err(), "Should reject handle: {}", handle);
        }
    }

    // Post date validation tests
    #[test]
    fn test_post_dates_convert_from_moscow_time() {
        let cases = vec![
            ("01.01.2025 12:00", "2025-01-01T09:00:00+00:00"),
            ("25.12.2024 18:00", "2024-12-25T15:00:00+00:00"),
            ("01.03.2025 02:59", "2025-02-28T23:59:00+00:00"),
            ("29.02.2024 00:00", "2024-02-28T21:00:00+00:00"),
        ];

        for (input, expected) in cases {
            let utc = validate_post_date(input).unwrap_or_else(|e| panic!("'{input}' rejected: {e}"));
            assert_eq!(utc.to_rfc3339(), expected, "Wrong conversion for {}", input);
        }
    }

    #[test]
    fn test_invalid_post_dates() {
        let invalid_dates = vec![
            "",
            "01.01.2025",
            "12:00 01.01.2025",
            "2025-01-01 12:00",
            "01.01.2025 12.00",
            "1.01.2025 12:00",
            "01.01.2025 12:00 MSK",
            "00.01.2025 12:00",
            "31.04.2025 12:00",
            "29.02.2025 12:00",
            "01.01.2025 25:00",
        ];

        for date in invalid_dates {
            assert!(validate_post_date(date).is_err(), "Should reject date: {}", date);
        }
    }

    #[test]
    fn test_campaign_label_round_trip() {
        let utc = parse_moscow_datetime("05.06.2025 09:30").unwrap();
        assert_eq!(format_moscow(&utc), "05.06.25 09:30");
    }

    // Post text validation tests
    #[test]
    fn test_post_text_must_not_be_blank() {
        assert!(validate_post_text(Some("Win a prize!")).is_ok());
        assert!(validate_post_text(Some(" \t\n")).is_err());
        assert!(validate_post_text(None).is_err());
    }
}
