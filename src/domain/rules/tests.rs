// Unit tests for business rules

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::model::{TimeSpec, CATEGORY_COUNT};
    use crate::domain::rules::*;

    #[test]
    fn test_normalize_category_in_range() {
        for category in 0..CATEGORY_COUNT {
            assert_eq!(normalize_category(category as i64), category);
        }
    }

    #[test]
    fn test_normalize_category_out_of_range() {
        assert_eq!(normalize_category(-1), 0);
        assert_eq!(normalize_category(CATEGORY_COUNT as i64), 0);
        assert_eq!(normalize_category(99), 0);
    }

    #[test]
    fn test_validate_entry_complete() {
        let entry = json!({"pos": 2.0, "comment": "intro", "type": 1});
        let marker = validate_entry(&entry).unwrap();
        assert_eq!(marker.position, TimeSpec::from_seconds(2.0));
        assert_eq!(marker.comment, "intro");
        assert_eq!(marker.category, 1);
    }

    #[test]
    fn test_validate_entry_defaults() {
        let marker = validate_entry(&json!({"pos": 1.0})).unwrap();
        assert_eq!(marker.comment, "Marker");
        assert_eq!(marker.category, 0);
    }

    #[test]
    fn test_validate_entry_clamps_category() {
        let marker = validate_entry(&json!({"pos": 3.0, "type": 7})).unwrap();
        assert_eq!(marker.category, 0);
    }

    #[test]
    fn test_validate_entry_skips_malformed() {
        // Not an object
        assert!(validate_entry(&json!(42)).is_none());
        assert!(validate_entry(&json!("marker")).is_none());
        // No position
        assert!(validate_entry(&json!({"comment": "bad"})).is_none());
        // Non-numeric position
        assert!(validate_entry(&json!({"pos": "2.0"})).is_none());
    }
}
