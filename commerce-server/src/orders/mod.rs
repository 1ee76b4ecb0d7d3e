//! Order lifecycle: creation, status transitions, returns, and refunds

pub mod actions;
pub mod ids;
pub mod manager;
pub mod storage;
pub mod transition;

pub use manager::{ManagerError, ManagerResult, OrderError, OrdersManager};
pub use storage::{CommerceStore, StorageError};
