//! Client library for an alarm-dog aggregation service.
//!
//! Builds signed JSON alarm reports, optionally addressed to an ad-hoc
//! [`Receiver`] (alarm groups plus notification [`Channel`]s), posts them
//! over HTTP and interprets the service verdict. Requests are
//! authenticated with an MD5 signature derived from the task id, the
//! current unix timestamp and a shared secret; the secret itself never
//! travels.
//!
//! Delivery guarantees, retries and alarm-state handling all live
//! server-side — this client's job ends with an interpreted response or a
//! classified error.

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod receiver;
pub mod response;
pub mod sign;
mod utils;


pub use channel::{Channel, DingGroup, Phone, Robot, Sms, Webhook, YachWorker};
pub use client::{AlarmClient, DEFAULT_BASE_URI};
pub use config::{AlarmConfig, ConfigProvider, HttpOptions, MapConfig};
pub use error::{AlarmError, InvalidArgument, Result};
pub use payload::AlarmRequest;
pub use receiver::Receiver;

/// Alarm severity, transmitted as its ordinal value.
///
/// The client attaches no semantics beyond the number; routing and
/// escalation by level are service concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlarmLevel {
    Notice = 0,
    Warning = 1,
    Error = 2,
    Emergency = 3,
}

impl serde::Serialize for AlarmLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

#[cfg(test)]
mod level_tests {
    use super::AlarmLevel;

    #[test]
    fn levels_serialize_to_ordinals() {
        let levels = [
            (AlarmLevel::Notice, 0),
            (AlarmLevel::Warning, 1),
            (AlarmLevel::Error, 2),
            (AlarmLevel::Emergency, 3),
        ];
        for (level, ordinal) in levels {
            assert_eq!(serde_json::to_value(level).unwrap(), serde_json::json!(ordinal));
        }
    }
}
