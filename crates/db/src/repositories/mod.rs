//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument. Multi-row cascades open their own
//! transaction and lock the project row first, so concurrent cascades on the
//! same project serialize.

pub mod application_repo;
pub mod event_repo;
pub mod freelancer_repo;
pub mod message_repo;
pub mod project_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use event_repo::EventRepo;
pub use freelancer_repo::FreelancerRepo;
pub use message_repo::MessageRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
