//! Outbound request assembly and alarm-content validation.

use serde::Serialize;
use serde_json::Value;

use crate::error::InvalidArgument;
use crate::receiver::Receiver;
use crate::sign;
use crate::AlarmLevel;

/// One signed request body, built fresh per call.
///
/// Optional fields are omitted from the wire entirely when unset; the
/// service distinguishes "absent" from "null".
#[derive(Debug, Clone, Serialize)]
pub struct AlarmRequest {
    pub taskid: u64,
    pub timestamp: i64,
    pub sign: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctn: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<AlarmLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Value>,
}

/// Assembles the body for `POST /alarm/report`.
///
/// Fails before any signing when credentials are missing or `content` is
/// not a keyed JSON object.
pub fn build_report(
    taskid: Option<u64>,
    token: Option<&str>,
    content: Value,
    notice_time: Option<i64>,
    level: Option<AlarmLevel>,
    receiver: Option<&Receiver>,
) -> Result<AlarmRequest, InvalidArgument> {
    let (taskid, token) = credentials(taskid, token)?;
    validate_content(&content)?;

    let timestamp = sign::unix_timestamp();
    Ok(AlarmRequest {
        taskid,
        timestamp,
        sign: sign::sign(taskid, token, timestamp),
        ctn: Some(content),
        notice_time,
        level,
        receiver: receiver.map(Receiver::to_value),
    })
}

/// Assembles the body for `POST /alarm/test`: credentials and signature
/// only, no content or targeting.
pub fn build_test(taskid: Option<u64>, token: Option<&str>) -> Result<AlarmRequest, InvalidArgument> {
    let (taskid, token) = credentials(taskid, token)?;
    let timestamp = sign::unix_timestamp();
    Ok(AlarmRequest {
        taskid,
        timestamp,
        sign: sign::sign(taskid, token, timestamp),
        ctn: None,
        notice_time: None,
        level: None,
        receiver: None,
    })
}

fn credentials<'a>(
    taskid: Option<u64>,
    token: Option<&'a str>,
) -> Result<(u64, &'a str), InvalidArgument> {
    match (taskid, token) {
        (Some(taskid), Some(token)) => Ok((taskid, token)),
        _ => Err(InvalidArgument::MissingCredentials),
    }
}

/// The `ctn` field must be a JSON object on the wire, never an array.
///
/// An object whose keys are exactly the dense decimal sequence
/// `"0".."n-1"` is treated as a positional list in disguise and rejected
/// the same way.
fn validate_content(content: &Value) -> Result<(), InvalidArgument> {
    match content {
        Value::Object(map) => {
            let dense = !map.is_empty()
                && map
                    .keys()
                    .enumerate()
                    .all(|(index, key)| key == &index.to_string());
            if dense {
                return Err(InvalidArgument::ContentNotObject);
            }
            Ok(())
        }
        _ => Err(InvalidArgument::ContentNotObject),
    }
}
