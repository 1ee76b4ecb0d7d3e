//! Commerce Server - order lifecycle backend
//!
//! Per-line-item order state machine for an apparel storefront: batch
//! splitting for partial cancellations and returns, transactional stock
//! reservation, and a refund workflow, all persisted in an embedded redb
//! database.
//!
//! # Module structure
//!
//! ```text
//! commerce-server/src/
//! ├── core/      # Configuration
//! ├── db/        # Catalog, cart, and payment config models
//! ├── orders/    # Storage, transition engine, actions, manager
//! └── utils/     # Logging, error re-exports
//! ```

pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use crate::core::Config;
pub use orders::{CommerceStore, ManagerError, OrdersManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};
