//! Entities and value objects as consumed from the helpdesk API

pub mod aggregates;
pub mod value_objects;
