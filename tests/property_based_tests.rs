use proptest::prelude::*;
use query_action::query_builder::{
    LimitOffset, Page, Pagination, QueryBuilder, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use query_action::scopes::{apply_scopes, where_id, where_like_keyword};

proptest! {
    /// Property: pagination never reports a non-positive page or size
    #[test]
    fn page_values_are_always_positive(curr in -1_000i64..1_000, size in -1_000i64..1_000) {
        let page = Page::new(curr, size);
        prop_assert!(page.current() >= 1);
        prop_assert!(page.size() >= 1);
        if curr <= 0 {
            prop_assert_eq!(page.current(), DEFAULT_PAGE);
        }
        if size <= 0 {
            prop_assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        }
    }

    /// Property: the window starts right after the previous pages
    #[test]
    fn window_offset_matches_page_arithmetic(curr in 1i64..10_000, size in 1i64..1_000) {
        let window = LimitOffset::from_pagination(&Page::new(curr, size));
        prop_assert_eq!(window.limit, Some(size as u64));
        prop_assert_eq!(window.offset, Some(((curr - 1) * size) as u64));
    }

    /// Property: the cap bounds the limit and keeps offsets aligned to it
    #[test]
    fn capped_window_never_exceeds_max(curr in 1i64..1_000, size in 1i64..5_000, max in 1u64..2_000) {
        let window = LimitOffset::from_pagination_capped(&Page::new(curr, size), max);
        let limit = window.limit.unwrap_or_default();
        prop_assert!(limit <= max);
        prop_assert_eq!(window.offset, Some((curr as u64 - 1) * limit));
    }

    /// Property: every row of the total lands on exactly one page
    #[test]
    fn total_pages_cover_every_row(size in 1i64..500, total in 0i64..100_000) {
        let mut page = Page::new(1, size);
        page.set_total(total);
        let pages = page.total_pages();
        prop_assert!(pages * size >= total);
        prop_assert!(pages == 0 || (pages - 1) * size < total);
    }

    /// Property: bind placeholders track the number of ids
    #[test]
    fn where_id_binds_one_placeholder_per_id(ids in prop::collection::vec(1i64..1_000_000, 1..50)) {
        let sql = apply_scopes(QueryBuilder::new("users"), &[where_id(ids.clone())]).build_sql();
        prop_assert_eq!(sql.matches('?').count(), ids.len());
    }

    /// Property: keywords never reach the SQL text
    #[test]
    fn keyword_is_always_bound(keyword in "[a-z%' ;-]{1,20}") {
        let sql = apply_scopes(
            QueryBuilder::new("users"),
            &[where_like_keyword(&keyword, &["name", "email"])],
        )
        .build_sql();
        prop_assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE (\"name\" LIKE ? OR \"email\" LIKE ?)".to_string()
        );
    }
}
