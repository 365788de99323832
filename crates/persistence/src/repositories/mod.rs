//! Repository implementations for database operations.

pub mod approval;
pub mod notification;
pub mod profile;
pub mod reservation;
pub mod resource;
pub mod space;
pub mod user;

pub use approval::ApprovalRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use reservation::{
    DecisionOutcome, NewReservation, ReservationChanges, ReservationRepository,
};
pub use resource::ResourceRepository;
pub use space::SpaceRepository;
pub use user::UserRepository;
