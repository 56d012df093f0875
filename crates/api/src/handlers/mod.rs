//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod bids;
pub mod crm;
pub mod hover;
pub mod plans;
