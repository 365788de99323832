//! Staff reports.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use persistence::repositories::ReservationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StaffAuth;
use crate::services::report::reservations_csv;

/// GET /api/v1/admin/reports/reservations.csv
pub async fn reservations_report(
    State(state): State<AppState>,
    staff: StaffAuth,
) -> Result<Response, ApiError> {
    let rows = ReservationRepository::new(state.pool.clone())
        .list_for_export()
        .await?;

    let body = reservations_csv(&rows).map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(
        user_id = %staff.actor.user_id,
        rows = rows.len(),
        "Reservation report exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reservations.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
