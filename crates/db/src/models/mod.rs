//! Row models and DTOs, one module per table.

pub mod bid;
pub mod bid_line_item;
pub mod bid_version;
pub mod hover_token;
pub mod plan;
pub mod plan_line_item;
pub mod price_list;
pub mod reference;
pub mod terms;
pub mod user;
