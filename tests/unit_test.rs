// Unit tests for userlist-tui
// These exercise the public API only.

#[cfg(test)]
mod pagination_tests {
    use userlist_tui::pagination::{PageInfo, current_page, offset_for_page, total_pages};

    #[test]
    fn test_first_of_three_pages() {
        let info = PageInfo::compute(0, 4, 10);
        assert_eq!(info.total, 3);
        assert_eq!(info.current, 1);
        assert!(!info.has_prev, "Prev should be disabled on page 1");
        assert!(info.has_next, "Next should be enabled on page 1 of 3");
    }

    #[test]
    fn test_advance_to_page_two() {
        assert_eq!(offset_for_page(current_page(0, 4) + 1, 4), 4);
    }

    #[test]
    fn test_empty_result_still_has_one_page() {
        assert_eq!(total_pages(0, 11), 1);
        let info = PageInfo::compute(0, 11, 0);
        assert!(!info.has_prev && !info.has_next);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(total_pages(12, 4), 3);
        assert_eq!(total_pages(13, 4), 4);
    }
}

#[cfg(test)]
mod model_tests {
    use userlist_tui::api::{Query, User, UserId};

    #[test]
    fn test_user_struct() {
        let user = User::new(7, "Grace", 28);
        assert_eq!(user.id, UserId::Num(7));
        assert_eq!(user.name, "Grace");
        assert_eq!(user.age_display(), "28");
    }

    #[test]
    fn test_query_with_limit_clamps_zero() {
        assert_eq!(Query::with_limit(0).limit, 1);
        assert_eq!(Query::with_limit(8).limit, 8);
    }

    #[test]
    fn test_user_serializes_back_to_api_shape() {
        let json = serde_json::to_value(User::new(1, "Al", 41)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Al", "age": 41}));
    }
}

#[cfg(test)]
mod search_tests {
    use userlist_tui::api::{Query, User};
    use userlist_tui::search::{count_matching, filter_page, matches};

    #[test]
    fn test_empty_query_matches_everyone() {
        let u = User::new(1, "Anyone", 99);
        assert!(matches(&u, &Query::default()));
    }

    #[test]
    fn test_combined_filters() {
        let users = vec![
            User::new(1, "Dana", 30),
            User::new(2, "Daniel", 31),
            User::new(3, "Bob", 30),
        ];
        let q = Query {
            name: "dan".into(),
            age: "30".into(),
            ..Query::default()
        };
        assert_eq!(count_matching(&users, &q), 1);
        assert_eq!(filter_page(&users, &q)[0].name, "Dana");
    }
}
