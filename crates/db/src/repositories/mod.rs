//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod bid_line_item_repo;
pub mod bid_repo;
pub mod bid_version_repo;
pub mod hover_token_repo;
pub mod plan_line_item_repo;
pub mod plan_repo;
pub mod price_list_repo;
pub mod reference_repo;
pub mod terms_repo;
pub mod user_repo;

pub use bid_line_item_repo::BidLineItemRepo;
pub use bid_repo::BidRepo;
pub use bid_version_repo::BidVersionRepo;
pub use hover_token_repo::HoverTokenRepo;
pub use plan_line_item_repo::PlanLineItemRepo;
pub use plan_repo::PlanRepo;
pub use price_list_repo::PriceListRepo;
pub use reference_repo::ReferenceRepo;
pub use terms_repo::TermsRepo;
pub use user_repo::UserRepo;
