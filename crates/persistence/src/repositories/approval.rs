//! Approval repository. Writes happen in [`super::ReservationRepository::decide`].

use sqlx::PgPool;

use crate::entities::ApprovalEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ApprovalRepository {
    pool: PgPool,
}

impl ApprovalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_reservation(
        &self,
        reservation_id: i64,
    ) -> Result<Option<ApprovalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_approval_by_reservation");
        let result = sqlx::query_as::<_, ApprovalEntity>(
            r#"
            SELECT id, reservation_id, approver_id, decision, notes, decided_at
            FROM approvals
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_for_reservation(&self, reservation_id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_approvals_for_reservation");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM approvals WHERE reservation_id = $1",
        )
        .bind(reservation_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
