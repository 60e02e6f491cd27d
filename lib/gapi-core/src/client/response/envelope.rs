use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::super::{ApiClientError, ApiError};

/// Decodes a response body into `T`.
///
/// The body is either a Google error envelope (`{"error": ...}`), a payload
/// wrapped in `{"data": ...}`, or the bare payload.
pub(in crate::client) fn decode<T>(
    path: &str,
    status: StatusCode,
    body: Option<&[u8]>,
) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    let Some(bytes) = body else {
        return decode_empty(status);
    };

    // a failure page (e.g. an HTML 502 from a proxy) is reported as an API error
    let value = parse(path, bytes).or_else(|err| {
        if status.is_success() {
            Err(err)
        } else {
            Ok(Value::Null)
        }
    })?;
    check_error(path, status, bytes, &value)?;

    if let Value::Object(object) = &value
        && let Some(data) = object.get("data")
    {
        match from_value::<T>(path, data, bytes) {
            Ok(result) => return Ok(result),
            Err(inner) => {
                // a payload may legitimately have a `data` field
                debug!(%path, "`data` payload does not match, decoding the whole body");
                return from_value::<T>(path, &value, bytes).map_err(|_| inner);
            }
        }
    }

    from_value(path, &value, bytes)
}

/// Checks a response for an error, without decoding a payload.
pub(in crate::client) fn check(
    path: &str,
    status: StatusCode,
    body: Option<&[u8]>,
) -> Result<(), ApiClientError> {
    match body {
        Some(bytes) => {
            // not JSON is fine when no payload is expected
            let value = serde_json::from_slice::<Value>(bytes).unwrap_or(Value::Null);
            check_error(path, status, bytes, &value)
        }
        None if status.is_success() => Ok(()),
        None => Err(ApiClientError::InvalidResponse {
            status_code: status.as_u16(),
        }),
    }
}

fn decode_empty<T>(status: StatusCode) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    let invalid = ApiClientError::InvalidResponse {
        status_code: status.as_u16(),
    };
    if status != StatusCode::NO_CONTENT {
        return Err(invalid);
    }
    T::deserialize(Value::Null).map_err(|_| invalid)
}

fn parse(path: &str, bytes: &[u8]) -> Result<Value, ApiClientError> {
    serde_json::from_slice(bytes).map_err(|error| ApiClientError::JsonError {
        path: path.to_string(),
        field: ".".to_string(),
        error,
        body: String::from_utf8_lossy(bytes).into_owned(),
    })
}

fn check_error(
    path: &str,
    status: StatusCode,
    bytes: &[u8],
    value: &Value,
) -> Result<(), ApiClientError> {
    let api_error = if value.get("error").is_some() {
        ApiError::from_envelope(status.as_u16(), value)
    } else if !status.is_success() {
        ApiError::from_status(status.as_u16(), &String::from_utf8_lossy(bytes))
    } else {
        return Ok(());
    };

    warn!(%path, code = api_error.code, status = ?api_error.status, message = %api_error.message, "API error");
    Err(ApiClientError::Api(api_error))
}

fn from_value<T>(path: &str, value: &Value, bytes: &[u8]) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize(value).map_err(|err| {
        let field = err.path().to_string();
        ApiClientError::JsonError {
            path: path.to_string(),
            field,
            error: err.into_inner(),
            body: String::from_utf8_lossy(bytes).into_owned(),
        }
    })
}
