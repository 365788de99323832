//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod approval;
pub mod notification;
pub mod profile;
pub mod reservation;
pub mod resource;
pub mod space;
pub mod user;

pub use approval::{ApprovalDecisionDb, ApprovalEntity};
pub use notification::NotificationEntity;
pub use profile::ProfileEntity;
pub use reservation::{
    AvailabilityRowEntity, ReservationEntity, ReservationExportEntity, ReservationStatusDb,
    ReservationWithDetailsEntity,
};
pub use resource::ResourceEntity;
pub use space::SpaceEntity;
pub use user::UserEntity;
