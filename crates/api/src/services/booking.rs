//! Reservation workflows on top of the transactional repository.
//!
//! Every write goes through [`ReservationRepository`], which checks for
//! overlaps and writes notifications in the same SERIALIZABLE transaction.
//! This layer adds the business counters and structured logs.

use domain::models::approval::{DecisionRequest, DecisionResponse};
use domain::models::reservation::{CreateReservationRequest, UpdateReservationRequest};
use domain::models::{Reservation, ReservationDetail};
use domain::services::{can_view, Actor, DecisionPolicy, StaffCapability, TimeSlot};
use domain::BookingError;
use persistence::repositories::{NewReservation, ReservationChanges, ReservationRepository};
use persistence::StoreError;
use sqlx::PgPool;
use tracing::info;

use crate::middleware::metrics::{
    record_reservation_conflict, record_reservation_created, record_reservation_decision,
};

pub struct BookingService {
    reservations: ReservationRepository,
    policy: DecisionPolicy,
}

impl BookingService {
    pub fn new(pool: PgPool, policy: DecisionPolicy) -> Self {
        Self {
            reservations: ReservationRepository::new(pool),
            policy,
        }
    }

    /// Books a slot for `actor`. The reservation starts out Pending.
    pub async fn create(
        &self,
        actor: &Actor,
        request: &CreateReservationRequest,
    ) -> Result<Reservation, StoreError> {
        let slot = TimeSlot::new(request.start_at, request.end_at)?;

        let reservation = self
            .reservations
            .create_checked(&NewReservation {
                user_id: actor.user_id,
                space_id: request.space_id,
                slot,
                purpose: request.purpose.trim().to_string(),
            })
            .await
            .map_err(|e| track_conflict(e, "create"))?;

        record_reservation_created();
        info!(
            reservation_id = reservation.id,
            space_id = reservation.space_id,
            user_id = %actor.user_id,
            "Reservation created"
        );

        Ok(reservation.into())
    }

    pub async fn update(
        &self,
        id: i64,
        actor: &Actor,
        request: &UpdateReservationRequest,
    ) -> Result<Reservation, StoreError> {
        let changes = ReservationChanges {
            space_id: request.space_id,
            start_at: request.start_at,
            end_at: request.end_at,
            purpose: request.purpose.as_deref().map(|p| p.trim().to_string()),
        };

        let reservation = self
            .reservations
            .update_checked(id, actor, &changes)
            .await
            .map_err(|e| track_conflict(e, "update"))?;

        info!(
            reservation_id = id,
            space_id = reservation.space_id,
            user_id = %actor.user_id,
            "Reservation updated"
        );

        Ok(reservation.into())
    }

    pub async fn cancel(&self, id: i64, actor: &Actor) -> Result<Reservation, StoreError> {
        let reservation = self.reservations.cancel(id, actor).await?;

        info!(
            reservation_id = id,
            user_id = %actor.user_id,
            by_staff = reservation.user_id != actor.user_id,
            "Reservation cancelled"
        );

        Ok(reservation.into())
    }

    /// Approves or rejects. The staff capability is checked by the caller's
    /// extractor; the transition rules and the re-decision policy here.
    pub async fn decide(
        &self,
        id: i64,
        capability: StaffCapability,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse, StoreError> {
        let outcome = self
            .reservations
            .decide(
                id,
                capability,
                request.decision,
                request.notes.trim(),
                self.policy,
            )
            .await
            .map_err(|e| track_conflict(e, "decide"))?;

        record_reservation_decision(request.decision);
        info!(
            reservation_id = id,
            approver_id = %capability.approver_id(),
            decision = request.decision.as_str(),
            previous_status = outcome.previous_status.as_str(),
            "Reservation decided"
        );

        let reservation: Reservation = outcome.reservation.into();
        Ok(DecisionResponse {
            reservation_id: reservation.id,
            status: reservation.status,
            approval: outcome.approval.into(),
        })
    }

    /// Owners see their own reservations and staff see all. Anyone else gets
    /// the same answer as for a missing id.
    pub async fn detail(&self, id: i64, actor: &Actor) -> Result<ReservationDetail, StoreError> {
        let detail = self
            .reservations
            .find_detail(id)
            .await?
            .filter(|d| can_view(actor, d.user_id))
            .ok_or(BookingError::ReservationNotFound(id))?;

        Ok(detail.into())
    }
}

fn track_conflict(err: StoreError, operation: &'static str) -> StoreError {
    if err.is_conflict() {
        record_reservation_conflict(operation);
        info!(operation, "Reservation refused: slot overlaps");
    }
    err
}
