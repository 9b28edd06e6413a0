// Network interface model

use serde::{Deserialize, Serialize};

/// Cumulative traffic of one interface since boot, in megabytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub rx_mb: f64,
    pub tx_mb: f64,
}
