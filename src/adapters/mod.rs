//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements         | Connects to                    |
//! |------------|--------------------|--------------------------------|
//! | `log_sink` | OutputListener     | Serial log output              |
//! | `time`     | Clock              | ESP32 system timer / `Instant` |
//! |            | DelayNs (host)     | `std::thread::sleep`           |

pub mod log_sink;
pub mod time;
