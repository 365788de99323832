//! Reservation repository.
//!
//! Every write that can change which reservations hold a slot runs the domain
//! conflict checker inside a SERIALIZABLE transaction that also locks the
//! space row. Notifications are inserted in the same transaction so they are
//! committed together with the change that caused them. A transaction that
//! loses a serialization race is replayed from the start a bounded number of
//! times before the caller sees a conflict.

use chrono::{DateTime, Utc};
use domain::models::{Decision, Reservation, ReservationStatus};
use domain::services::notification::{cancellation_message, decision_message, NEW_PENDING_MESSAGE};
use domain::services::{
    check_editable, ensure_no_conflict, plan_cancellation, plan_decision, Actor, BookedSlot,
    ConflictQuery, DecisionPolicy, StaffCapability, TimeSlot,
};
use domain::BookingError;
use sqlx::{PgConnection, PgPool};
use std::future::Future;
use uuid::Uuid;

use crate::entities::{
    ApprovalDecisionDb, ApprovalEntity, AvailabilityRowEntity, ReservationEntity,
    ReservationExportEntity, ReservationStatusDb, ReservationWithDetailsEntity, SpaceEntity,
};
use crate::error::StoreError;
use crate::metrics::QueryTimer;

const RESERVATION_COLUMNS: &str =
    "id, user_id, space_id, start_at, end_at, purpose, status, created_at";

const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.email AS user_email, r.space_id, s.name AS space_name,
           r.start_at, r.end_at, r.purpose, r.status, r.created_at
    FROM reservations r
    JOIN users u ON u.id = r.user_id
    JOIN spaces s ON s.id = r.space_id
"#;

/// Input for a new reservation. The slot is already validated.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub space_id: i64,
    pub slot: TimeSlot,
    pub purpose: String,
}

/// Requested changes to a pending reservation. Missing fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub space_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub purpose: Option<String>,
}

/// Outcome of a staff decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub reservation: ReservationEntity,
    pub approval: ApprovalEntity,
    pub previous_status: ReservationStatus,
}

/// Repository for reservation-related database operations.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending reservation if its slot is free, and notifies every
    /// active staff member.
    pub async fn create_checked(
        &self,
        new: &NewReservation,
    ) -> Result<ReservationEntity, StoreError> {
        let timer = QueryTimer::new("create_reservation_checked");
        let result = retry_serializable(move || self.create_checked_tx(new)).await;
        timer.record();
        result
    }

    async fn create_checked_tx(
        &self,
        new: &NewReservation,
    ) -> Result<ReservationEntity, StoreError> {
        let mut tx = self.pool.begin().await?;
        set_serializable(&mut *tx).await?;

        lock_active_space(&mut *tx, new.space_id).await?;
        let existing = blocking_slots(&mut *tx, new.space_id, &new.slot).await?;
        ensure_no_conflict(&ConflictQuery::new(new.space_id, new.slot), &existing)?;

        let reservation = sqlx::query_as::<_, ReservationEntity>(&format!(
            r#"
            INSERT INTO reservations (user_id, space_id, start_at, end_at, purpose, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.space_id)
        .bind(new.slot.start())
        .bind(new.slot.end())
        .bind(&new.purpose)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, message)
            SELECT id, $1 FROM users WHERE is_staff AND is_active
            "#,
        )
        .bind(NEW_PENDING_MESSAGE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Applies owner edits to a pending reservation, re-checking its slot
    /// against every other reservation in the target space.
    pub async fn update_checked(
        &self,
        id: i64,
        actor: &Actor,
        changes: &ReservationChanges,
    ) -> Result<ReservationEntity, StoreError> {
        let timer = QueryTimer::new("update_reservation_checked");
        let result = retry_serializable(move || self.update_checked_tx(id, actor, changes)).await;
        timer.record();
        result
    }

    async fn update_checked_tx(
        &self,
        id: i64,
        actor: &Actor,
        changes: &ReservationChanges,
    ) -> Result<ReservationEntity, StoreError> {
        let mut tx = self.pool.begin().await?;
        set_serializable(&mut *tx).await?;

        let current = lock_reservation(&mut *tx, id).await?;
        check_editable(actor, &Reservation::from(current.clone()))?;

        let space_id = changes.space_id.unwrap_or(current.space_id);
        let slot = TimeSlot::new(
            changes.start_at.unwrap_or(current.start_at),
            changes.end_at.unwrap_or(current.end_at),
        )?;
        let purpose = changes.purpose.as_deref().unwrap_or(&current.purpose);

        lock_active_space(&mut *tx, space_id).await?;
        let existing = blocking_slots(&mut *tx, space_id, &slot).await?;
        ensure_no_conflict(&ConflictQuery::new(space_id, slot).excluding(id), &existing)?;

        let updated = sqlx::query_as::<_, ReservationEntity>(&format!(
            r#"
            UPDATE reservations
            SET space_id = $2, start_at = $3, end_at = $4, purpose = $5
            WHERE id = $1
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(space_id)
        .bind(slot.start())
        .bind(slot.end())
        .bind(purpose)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Records a staff decision: upserts the single approval row, moves the
    /// reservation status and notifies the owner, all in one transaction.
    pub async fn decide(
        &self,
        id: i64,
        capability: StaffCapability,
        decision: Decision,
        notes: &str,
        policy: DecisionPolicy,
    ) -> Result<DecisionOutcome, StoreError> {
        let timer = QueryTimer::new("decide_reservation");
        let result = retry_serializable(move || {
            self.decide_tx(id, capability, decision, notes, policy)
        })
        .await;
        timer.record();
        result
    }

    async fn decide_tx(
        &self,
        id: i64,
        capability: StaffCapability,
        decision: Decision,
        notes: &str,
        policy: DecisionPolicy,
    ) -> Result<DecisionOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;
        set_serializable(&mut *tx).await?;

        let current = lock_reservation(&mut *tx, id).await?;
        let snapshot = Reservation::from(current.clone());
        let plan = plan_decision(capability, &snapshot, decision, notes, policy)?;

        let space = lock_space(&mut *tx, current.space_id).await?;
        if plan.requires_conflict_check {
            let slot = TimeSlot::new(current.start_at, current.end_at)?;
            let existing = blocking_slots(&mut *tx, current.space_id, &slot).await?;
            ensure_no_conflict(
                &ConflictQuery::new(current.space_id, slot).excluding(id),
                &existing,
            )?;
        }

        let approval = sqlx::query_as::<_, ApprovalEntity>(
            r#"
            INSERT INTO approvals (reservation_id, approver_id, decision, notes, decided_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (reservation_id) DO UPDATE
            SET approver_id = EXCLUDED.approver_id,
                decision = EXCLUDED.decision,
                notes = EXCLUDED.notes,
                decided_at = NOW()
            RETURNING id, reservation_id, approver_id, decision, notes, decided_at
            "#,
        )
        .bind(plan.reservation_id)
        .bind(plan.approver_id)
        .bind(ApprovalDecisionDb::from(plan.decision))
        .bind(&plan.notes)
        .fetch_one(&mut *tx)
        .await?;

        let reservation = set_status(&mut *tx, id, plan.new_status).await?;

        insert_notification(
            &mut *tx,
            plan.owner_id,
            &decision_message(&space.name, current.start_at, plan.decision),
        )
        .await?;

        tx.commit().await?;

        Ok(DecisionOutcome {
            reservation,
            approval,
            previous_status: plan.previous_status,
        })
    }

    /// Cancels a pending or approved reservation, releasing its slot.
    pub async fn cancel(&self, id: i64, actor: &Actor) -> Result<ReservationEntity, StoreError> {
        let timer = QueryTimer::new("cancel_reservation");
        let result = self.cancel_tx(id, actor).await;
        timer.record();
        result
    }

    async fn cancel_tx(&self, id: i64, actor: &Actor) -> Result<ReservationEntity, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_reservation(&mut *tx, id).await?;
        let plan = plan_cancellation(actor, &Reservation::from(current.clone()))?;

        let reservation = set_status(&mut *tx, id, ReservationStatus::Cancelled).await?;

        if plan.notify_owner {
            let space = lock_space(&mut *tx, current.space_id).await?;
            insert_notification(
                &mut *tx,
                plan.owner_id,
                &cancellation_message(&space.name, current.start_at),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(reservation)
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reservation_by_id");
        let result = sqlx::query_as::<_, ReservationEntity>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a reservation with owner and space details.
    pub async fn find_detail(
        &self,
        id: i64,
    ) -> Result<Option<ReservationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reservation_detail");
        let result = sqlx::query_as::<_, ReservationWithDetailsEntity>(&format!(
            "{DETAIL_SELECT} WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user's reservations, latest start first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReservationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservations_for_user");
        let result = sqlx::query_as::<_, ReservationWithDetailsEntity>(&format!(
            "{DETAIL_SELECT} WHERE r.user_id = $1 ORDER BY r.start_at DESC, r.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_reservations_for_user");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservations WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Most recently created pending reservations of a user.
    pub async fn list_recent_pending_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ReservationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_recent_pending_for_user");
        let result = sqlx::query_as::<_, ReservationWithDetailsEntity>(&format!(
            r#"{DETAIL_SELECT}
            WHERE r.user_id = $1 AND r.status = 'pending'
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $2"#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approved reservations of a user starting at or after `now`, soonest first.
    pub async fn list_upcoming_approved_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ReservationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_approved_for_user");
        let result = sqlx::query_as::<_, ReservationWithDetailsEntity>(&format!(
            r#"{DETAIL_SELECT}
            WHERE r.user_id = $1 AND r.status = 'approved' AND r.start_at >= $2
            ORDER BY r.start_at ASC, r.id ASC
            LIMIT $3"#
        ))
        .bind(user_id)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reservations awaiting a decision, oldest request first.
    pub async fn list_pending(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReservationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_reservations");
        let result = sqlx::query_as::<_, ReservationWithDetailsEntity>(&format!(
            r#"{DETAIL_SELECT}
            WHERE r.status = 'pending'
            ORDER BY r.created_at ASC, r.id ASC
            LIMIT $1 OFFSET $2"#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pending_reservations");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Calendar rows for every reservation holding a slot, optionally for one space.
    pub async fn list_availability(
        &self,
        space_id: Option<i64>,
    ) -> Result<Vec<AvailabilityRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_availability");
        let result = sqlx::query_as::<_, AvailabilityRowEntity>(
            r#"
            SELECT r.id, s.name AS space_name, r.status, r.start_at, r.end_at
            FROM reservations r
            JOIN spaces s ON s.id = r.space_id
            WHERE r.status IN ('pending', 'approved')
              AND ($1::BIGINT IS NULL OR r.space_id = $1)
            ORDER BY r.start_at ASC, r.id ASC
            "#,
        )
        .bind(space_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Every reservation, for the CSV report.
    pub async fn list_for_export(&self) -> Result<Vec<ReservationExportEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservations_for_export");
        let result = sqlx::query_as::<_, ReservationExportEntity>(
            r#"
            SELECT r.id, u.email AS user_email, s.name AS space_name,
                   r.start_at, r.end_at, r.status
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN spaces s ON s.id = r.space_id
            ORDER BY r.start_at DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

async fn retry_serializable<T, F, Fut>(mut run: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 1;
    loop {
        match run().await {
            Err(StoreError::SerializationFailure) if attempt < MAX_TRANSACTION_ATTEMPTS => {
                tracing::debug!(attempt, "Serialization failure, retrying transaction");
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn set_serializable(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(conn)
        .await
        .map(|_| ())
}

async fn lock_space(conn: &mut PgConnection, space_id: i64) -> Result<SpaceEntity, StoreError> {
    sqlx::query_as::<_, SpaceEntity>(
        r#"
        SELECT id, name, location, capacity, is_active, created_at, updated_at
        FROM spaces
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(space_id)
    .fetch_optional(conn)
    .await?
    .ok_or(StoreError::Booking(BookingError::SpaceNotFound(space_id)))
}

async fn lock_active_space(
    conn: &mut PgConnection,
    space_id: i64,
) -> Result<SpaceEntity, StoreError> {
    let space = lock_space(conn, space_id).await?;
    if !space.is_active {
        return Err(BookingError::SpaceInactive(space_id).into());
    }
    Ok(space)
}

async fn lock_reservation(
    conn: &mut PgConnection,
    id: i64,
) -> Result<ReservationEntity, StoreError> {
    sqlx::query_as::<_, ReservationEntity>(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(StoreError::Booking(BookingError::ReservationNotFound(id)))
}

/// Slot-holding reservations of a space whose interval touches the candidate
/// window. The domain checker makes the final call.
async fn blocking_slots(
    conn: &mut PgConnection,
    space_id: i64,
    slot: &TimeSlot,
) -> Result<Vec<BookedSlot>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReservationEntity>(&format!(
        r#"
        SELECT {RESERVATION_COLUMNS}
        FROM reservations
        WHERE space_id = $1
          AND status IN ('pending', 'approved')
          AND start_at < $3
          AND end_at > $2
        "#
    ))
    .bind(space_id)
    .bind(slot.start())
    .bind(slot.end())
    .fetch_all(conn)
    .await?;

    Ok(rows.iter().filter_map(ReservationEntity::booked_slot).collect())
}

async fn set_status(
    conn: &mut PgConnection,
    id: i64,
    status: ReservationStatus,
) -> Result<ReservationEntity, sqlx::Error> {
    sqlx::query_as::<_, ReservationEntity>(&format!(
        "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {RESERVATION_COLUMNS}"
    ))
    .bind(id)
    .bind(ReservationStatusDb::from(status))
    .fetch_one(conn)
    .await
}

async fn insert_notification(
    conn: &mut PgConnection,
    user_id: Uuid,
    message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO notifications (user_id, message) VALUES ($1, $2)")
        .bind(user_id)
        .bind(message)
        .execute(conn)
        .await
        .map(|_| ())
}
