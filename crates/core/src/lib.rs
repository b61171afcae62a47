//! Domain types and pure logic for the clinic site.
//!
//! Nothing in this crate touches the database, the network or the
//! filesystem; the `db`, `storage` and `api` crates build on it.

pub mod content;
pub mod error;
pub mod imaging;
pub mod mock_data;
pub mod ordered_list;
pub mod roles;
pub mod site_content;
pub mod slug;
pub mod types;
pub mod validation;
