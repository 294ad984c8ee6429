//! Aggregates
pub mod category;
pub mod ticket;
pub mod user;
pub use category::{Category, Subcategory};
pub use ticket::{Comment, Ticket};
pub use user::User;
