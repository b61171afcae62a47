//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

mod ordering;

pub mod content_repo;
pub mod doctor_repo;
pub mod institute_repo;
pub mod role_repo;
pub mod session_repo;
pub mod testimonial_repo;
pub mod user_repo;

pub use content_repo::ContentRepo;
pub use doctor_repo::DoctorRepo;
pub use institute_repo::InstituteRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use testimonial_repo::TestimonialRepo;
pub use user_repo::UserRepo;
