//! Document delivery services: PDF rendering, artifact storage, and
//! transactional email. All three wrap managed external services.

pub mod email;
pub mod pdf;
pub mod storage;
