//! Response interpretation for `POST /alarm/test`.

use serde_json::{Map, Value};

use crate::error::{AlarmError, Result};

/// Interprets a raw service response into the decoded JSON object.
///
/// Three checks, in a fixed order, each short-circuiting with its own
/// [`AlarmError`] kind:
///
/// 1. status code != 200 → [`AlarmError::BadStatus`];
/// 2. body not parseable as a JSON object with a `code` key →
///    [`AlarmError::InvalidBody`];
/// 3. `code` != 0 → [`AlarmError::ServiceError`] carrying the service
///    `msg`.
///
/// The order matters: the status is checked before the body is parsed, so
/// a 500 with a garbage body classifies as `BadStatus`, not `InvalidBody`.
pub fn resolve(status: u16, body: &str) -> Result<Map<String, Value>> {
    if status != 200 {
        return Err(AlarmError::BadStatus {
            status,
            body: body.to_string(),
        });
    }

    let map = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if map.contains_key("code") => map,
        _ => {
            return Err(AlarmError::InvalidBody {
                body: body.to_string(),
            })
        }
    };

    // strict comparison: a non-integer `code` is a service error too
    if map.get("code").and_then(Value::as_i64) != Some(0) {
        let msg = map
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(AlarmError::ServiceError {
            msg,
            json: Value::Object(map),
        });
    }

    Ok(map)
}

/// Reads status and body out of a transport response and delegates to
/// [`resolve`]. A body-read failure classifies as a sending error.
pub async fn resolve_response(response: reqwest::Response) -> Result<Map<String, Value>> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    resolve(status, &body)
}
