//! Infrastructure layer - Storage, service and logging implementations

pub mod logging;
pub mod storage;
pub mod user;
