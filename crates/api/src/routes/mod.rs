//! HTTP route handlers.

pub mod approvals;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod reports;
pub mod reservations;
pub mod resources;
pub mod spaces;

use domain::models::reservation::ListReservationsQuery;

/// Normalizes a page request: pages start at 1 and `per_page` is kept
/// within `1..=max_page_size`.
pub(crate) fn page_window(query: &ListReservationsQuery, max_page_size: i64) -> (i64, i64) {
    let per_page = query.per_page.clamp(1, max_page_size.max(1));
    // Keeps the row offset representable for any requested page.
    let page = query.page.clamp(1, i64::MAX / per_page);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Pagination;

    fn query(page: i64, per_page: i64) -> ListReservationsQuery {
        ListReservationsQuery { page, per_page }
    }

    #[test]
    fn test_page_window_clamps() {
        assert_eq!(page_window(&query(0, 20), 100), (1, 20));
        assert_eq!(page_window(&query(3, 500), 100), (3, 100));
        assert_eq!(page_window(&query(2, 0), 100), (2, 1));
        assert_eq!(page_window(&query(-4, -1), 50), (1, 1));
    }

    #[test]
    fn test_page_window_keeps_offset_in_range() {
        let (page, per_page) = page_window(&query(i64::MAX, 100), 100);
        assert_eq!(per_page, 100);
        assert_eq!(page, i64::MAX / 100);
        assert!(Pagination::offset(page, per_page) >= 0);
        assert!((page - 1).checked_mul(per_page).is_some());
    }
}
