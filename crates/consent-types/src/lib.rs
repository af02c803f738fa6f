//! Core types and traits for the account access consent API.
//!
//! Request/response DTOs follow the Open Banking account-access-consents JSON shape.

mod dto;
mod model;
mod traits;

pub use dto::*;
pub use model::*;
pub use traits::*;
