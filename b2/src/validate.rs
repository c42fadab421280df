//! Helper functions for checking the shape of the JSON bodies returned by the remote API.

use crate::api::Call;
use crate::error::Protocol;
use crate::{Error, Result};

use serde_json::{Map, Value};

/// Parses `body` and returns its top level object.
///
/// Any other top level value, including `null`, `true` and `false`, is a protocol error.
pub(crate) fn json_object(call: Call, body: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        Error::Protocol(Protocol::InvalidJson {
            call,
            details: err.to_string(),
        })
    })?;

    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(Error::Protocol(Protocol::NotAnObject { call })),
    }
}

/// Checks that `obj` has all the `keys`. A key whose value is `null` is considered absent.
pub(crate) fn require_keys(
    call: Call,
    obj: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<()> {
    for &key in keys {
        match obj.get(key) {
            None | Some(Value::Null) => {
                return Err(Error::Protocol(Protocol::MissingField { call, field: key }));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Returns the value of `key`, which must be a string.
pub(crate) fn string_field<'a>(
    call: Call,
    obj: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            Err(Error::Protocol(Protocol::MissingField { call, field: key }))
        }
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Error::Protocol(Protocol::InvalidField { call, field: key })),
    }
}

/// Returns the value of `key`, which must be an absolute HTTP(S) URL.
pub(crate) fn url_field<'a>(
    call: Call,
    obj: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str> {
    let value = string_field(call, obj, key)?;
    let details = match url::Url::parse(value) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => return Ok(value),
        Ok(u) => format!("unsupported scheme {:?}", u.scheme()),
        Err(err) => err.to_string(),
    };

    Err(Error::Protocol(Protocol::InvalidUrl {
        call,
        field: key,
        details,
    }))
}

/// Checks that `key` is a string exactly equal to `expected`.
pub(crate) fn require_value(
    call: Call,
    obj: &Map<String, Value>,
    key: &'static str,
    expected: &str,
) -> Result<()> {
    let found = string_field(call, obj, key)?;
    if found != expected {
        return Err(Error::Protocol(Protocol::UnexpectedValue {
            call,
            field: key,
            expected: String::from(expected),
            found: String::from(found),
        }));
    }

    Ok(())
}

/// Parses `body` as the response of `call` and checks that it has all the keys that the call
/// requires.
pub(crate) fn response(call: Call, body: &[u8]) -> Result<Map<String, Value>> {
    let obj = json_object(call, body)?;
    require_keys(call, &obj, call.required_keys())?;
    Ok(obj)
}

#[cfg(test)]
mod test {
    use super::*;

    fn obj(json: &str) -> Map<String, Value> {
        json_object(Call::GetFileInfo, json.as_bytes()).expect("valid JSON object")
    }

    #[test]
    fn test_json_object() {
        {
            // OK case.
            let o = obj(r#"{"fileId":"4_z1","fileName":"a.txt"}"#);
            assert_eq!(o.len(), 2, "number of keys");
        }
        {
            // Error case: not JSON.
            match json_object(Call::AuthorizeAccount, b"<html>oops</html>") {
                Err(Error::Protocol(Protocol::InvalidJson { call, .. })) => {
                    assert_eq!(call, Call::AuthorizeAccount, "call");
                }
                other => panic!("expected an invalid JSON error, got {:?}", other),
            }
        }
        {
            // Error case: empty body.
            match json_object(Call::AuthorizeAccount, b"") {
                Err(Error::Protocol(Protocol::InvalidJson { .. })) => {}
                other => panic!("expected an invalid JSON error, got {:?}", other),
            }
        }
        {
            // Error case: top level values which aren't objects.
            for body in ["null", "true", "false", "0", r#""str""#, "[]"] {
                match json_object(Call::GetUploadUrl, body.as_bytes()) {
                    Err(Error::Protocol(Protocol::NotAnObject { call })) => {
                        assert_eq!(call, Call::GetUploadUrl, "call");
                    }
                    other => {
                        panic!("expected a not an object error for {}, got {:?}", body, other)
                    }
                }
            }
        }
    }

    #[test]
    fn test_require_keys() {
        let o = obj(r#"{"fileId":"4_z1","fileName":null,"extra":1}"#);

        require_keys(Call::GetFileInfo, &o, &["fileId", "extra"]).expect("keys are present");
        require_keys(Call::GetFileInfo, &o, &[]).expect("no keys are required");

        match require_keys(Call::GetFileInfo, &o, &["fileId", "fileName"]) {
            Err(Error::Protocol(Protocol::MissingField { field, .. })) => {
                assert_eq!(field, "fileName", "null value is a missing field");
            }
            other => panic!("expected a missing field error, got {:?}", other),
        }

        match require_keys(Call::GetFileInfo, &o, &["contentSha1"]) {
            Err(Error::Protocol(Protocol::MissingField { field, .. })) => {
                assert_eq!(field, "contentSha1", "absent key");
            }
            other => panic!("expected a missing field error, got {:?}", other),
        }
    }

    #[test]
    fn test_string_field() {
        let o = obj(r#"{"fileId":"4_z1","size":11}"#);

        assert_eq!(
            string_field(Call::GetFileInfo, &o, "fileId").expect("string field"),
            "4_z1"
        );

        match string_field(Call::GetFileInfo, &o, "size") {
            Err(Error::Protocol(Protocol::InvalidField { field, .. })) => {
                assert_eq!(field, "size", "field");
            }
            other => panic!("expected an invalid field error, got {:?}", other),
        }
    }

    #[test]
    fn test_url_field() {
        let o = obj(
            r#"{"apiUrl":"https://api.example.test","rel":"not a url","ftp":"ftp://x.test","n":1}"#,
        );

        assert_eq!(
            url_field(Call::AuthorizeAccount, &o, "apiUrl").expect("valid URL"),
            "https://api.example.test"
        );

        for field in ["rel", "ftp"] {
            match url_field(Call::AuthorizeAccount, &o, field) {
                Err(Error::Protocol(Protocol::InvalidUrl { call, field: f, .. })) => {
                    assert_eq!(call, Call::AuthorizeAccount, "call");
                    assert_eq!(f, field, "field");
                }
                other => panic!("expected an invalid URL error for {}, got {:?}", field, other),
            }
        }

        match url_field(Call::AuthorizeAccount, &o, "n") {
            Err(Error::Protocol(Protocol::InvalidField { .. })) => {}
            other => panic!("expected an invalid field error, got {:?}", other),
        }
    }

    #[test]
    fn test_require_value() {
        let o = obj(r#"{"fileId":"4_z1","fileName":"dir/a.txt","n":1}"#);

        require_value(Call::GetFileInfo, &o, "fileName", "dir/a.txt").expect("same value");

        match require_value(Call::GetFileInfo, &o, "fileName", "dir/A.txt") {
            Err(Error::Protocol(Protocol::UnexpectedValue {
                field,
                expected,
                found,
                ..
            })) => {
                assert_eq!(field, "fileName", "field");
                assert_eq!(expected, "dir/A.txt", "expected");
                assert_eq!(found, "dir/a.txt", "found");
            }
            other => panic!("expected an unexpected value error, got {:?}", other),
        }

        match require_value(Call::GetFileInfo, &o, "n", "1") {
            Err(Error::Protocol(Protocol::InvalidField { .. })) => {}
            other => panic!("type strict comparison expected, got {:?}", other),
        }
    }

    #[test]
    fn test_response() {
        let body = br#"{"bucketId":"buck-1","authorizationToken":"t","uploadUrl":"u"}"#;
        response(Call::GetUploadUrl, body).expect("all the keys are present");

        match response(
            Call::GetUploadUrl,
            br#"{"bucketId":"buck-1","authorizationToken":"t"}"#,
        ) {
            Err(Error::Protocol(Protocol::MissingField { call, field })) => {
                assert_eq!(call, Call::GetUploadUrl, "call");
                assert_eq!(field, "uploadUrl", "field");
            }
            other => panic!("expected a missing field error, got {:?}", other),
        }
    }
}
