// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_time_spec_parsing() {
        assert_eq!(TimeSpec::parse("90.5").unwrap().as_seconds(), 90.5);
        assert_eq!(TimeSpec::parse("01:30").unwrap().as_seconds(), 90.0);
        assert_eq!(TimeSpec::parse("01:30.500").unwrap().as_seconds(), 90.5);
        assert_eq!(TimeSpec::parse("00:01:30.500").unwrap().as_seconds(), 90.5);
        assert_eq!(TimeSpec::parse("1:02:30.5").unwrap().as_seconds(), 3750.5);

        assert!(TimeSpec::parse("invalid").is_err());
        assert!(TimeSpec::parse("-5").is_err());
        assert!(TimeSpec::parse("01:75").is_err());
        assert!(TimeSpec::parse("00:75:00").is_err());
    }

    #[test]
    fn test_time_spec_exact_equality() {
        // Equal seconds values always land on the same tick
        let a = TimeSpec::from_seconds(2.0);
        let b = TimeSpec::from_seconds(2.0);
        assert_eq!(a, b);
        assert_eq!(a.ticks(), 2 * TICKS_PER_SECOND);

        // Seconds round trip is lossless for tick-representable values
        let c = TimeSpec::from_ticks(123_456);
        assert_eq!(TimeSpec::from_seconds(c.as_seconds()), c);
    }

    #[test]
    fn test_time_spec_frame_conversions() {
        let rate = FrameRate::fps_25();
        let pos = TimeSpec::from_frames(50, rate);
        assert_eq!(pos.as_seconds(), 2.0);
        assert_eq!(pos.to_frames(rate), 50);

        // NTSC rates convert exactly in both directions
        let ntsc = FrameRate::fps_ntsc();
        for frame in [0i64, 1, 29, 30, 1000, 123_457] {
            assert_eq!(TimeSpec::from_frames(frame, ntsc).to_frames(ntsc), frame);
        }

        // The same instant maps to different frames under different rates
        let t = TimeSpec::from_seconds(2.0);
        assert_eq!(t.to_frames(FrameRate::fps_25()), 50);
        assert_eq!(t.to_frames(FrameRate::fps_30()), 60);
    }

    #[test]
    fn test_time_spec_ordering() {
        let mut times = vec![
            TimeSpec::from_seconds(3.0),
            TimeSpec::from_seconds(1.0),
            TimeSpec::from_seconds(2.0),
        ];
        times.sort();
        assert_eq!(
            times.iter().map(|t| t.as_seconds()).collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_time_spec_formatting() {
        assert_eq!(TimeSpec::from_seconds(90.5).format_hms(), "1:30.500");
        assert_eq!(TimeSpec::from_seconds(3750.5).format_hms(), "1:02:30.500");
        assert_eq!(TimeSpec::zero().format_hms(), "0:00.000");
    }

    #[test]
    fn test_frame_rate_construction() {
        let rate = FrameRate::new(25, 1).unwrap();
        assert_eq!(rate.as_fps(), 25.0);

        // Rationals are reduced, so equal rates compare equal
        assert_eq!(FrameRate::new(50, 2).unwrap(), FrameRate::fps_25());

        assert!(FrameRate::new(0, 1).is_err());
        assert!(FrameRate::new(25, 0).is_err());
    }

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(FrameRate::parse("25").unwrap(), FrameRate::fps_25());
        assert_eq!(
            FrameRate::parse("30000/1001").unwrap(),
            FrameRate::fps_ntsc()
        );
        assert_eq!(FrameRate::parse("23.976").unwrap().num(), 2997);

        assert!(FrameRate::parse("0").is_err());
        assert!(FrameRate::parse("-25").is_err());
        assert!(FrameRate::parse("25/0").is_err());
        assert!(FrameRate::parse("abc").is_err());
    }

    #[test]
    fn test_marker_category_validation() {
        let pos = TimeSpec::from_seconds(1.0);
        let marker = Marker::new(pos, "intro".to_string(), 2).unwrap();
        assert_eq!(marker.color(), CATEGORY_COLORS[2]);

        assert!(Marker::new(pos, "bad".to_string(), CATEGORY_COUNT).is_err());
    }

    #[test]
    fn test_category_color_lookup() {
        assert_eq!(category_color(0), Some("#ff0000"));
        assert_eq!(category_color(4), Some("#00ffff"));
        assert_eq!(category_color(5), None);
    }
}
