//! Payment configuration model

use serde::{Deserialize, Serialize};

/// Which payment methods are currently accepted
///
/// Consulted before order creation; a disabled method rejects the order
/// before any mutation happens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentConfig {
    pub cod_enabled: bool,
    pub online_payment_enabled: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            cod_enabled: true,
            online_payment_enabled: false,
        }
    }
}
