use clinica_core::types::DbId;
use serde::Deserialize;

pub mod admin_users;
pub mod auth;
pub mod content;
pub mod doctors;
pub mod institutes;
pub mod lists;
pub mod pages;
pub mod testimonials;
pub mod uploads;

/// Request body for `PUT /admin/{doctors|institutes|testimonials}/order`.
///
/// `ids` must list every existing row exactly once, in the new order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<DbId>,
}
