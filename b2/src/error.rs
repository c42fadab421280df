//! Errors returned by this crate.

use crate::api::Call;

use std::error as stderr;
use std::fmt;

/// Convenient type alias to shorten the signature on every usage.
pub(crate) type BoxError = Box<dyn stderr::Error + Send + Sync>;

/// The error type that this crate use for wrapping errors.
///
/// Callers can branch on the variant to know whether the configuration is wrong, the remote API
/// couldn't be reached, or the remote API answered something unexpected.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Identifies a required setting which is missing or invalid. It's always returned before any
    /// request is sent.
    Configuration(Setting),
    /// Identifies a request that couldn't be completed or that the remote API rejected with a
    /// non-success HTTP status.
    Transport(Transport),
    /// Identifies a response whose body doesn't have the shape or the values that the remote API
    /// must return.
    Protocol(Protocol),
}

impl Error {
    /// Convenient constructor for creating a [`Configuration` variant](Self::Configuration).
    ///
    /// See [`Setting`] documentation to know about the convention for the value of the `names`
    /// parameter.
    pub fn new_configuration(names: &str, msg: &str) -> Self {
        Self::Configuration(Setting::new(names, msg))
    }

    /// Creates a [`Transport` variant](Self::Transport) from the provided context message and the
    /// error that originated it, when the request didn't get any response.
    pub(crate) fn new_transport(ctx_msg: &str, err: BoxError) -> Self {
        Self::Transport(Transport {
            ctx_msg: String::from(ctx_msg),
            status: None,
            api_error: None,
            inner: Some(err),
        })
    }

    /// Creates a [`Transport` variant](Self::Transport) for a response with a non-success HTTP
    /// status.
    ///
    /// `body` is decoded as the error body of the remote API when possible.
    pub(crate) fn new_status(call: Call, status: u16, body: &[u8]) -> Self {
        Self::Transport(Transport {
            ctx_msg: format!("{} returned HTTP status {}", call, status),
            status: Some(status),
            api_error: ApiError::from_body(body),
            inner: None,
        })
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Configuration { .. } => None,
            Error::Protocol { .. } => None,
            Error::Transport(Transport { inner, .. }) => inner
                .as_ref()
                .map(|e| e.as_ref() as &(dyn stderr::Error + 'static)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Configuration(setting) => {
                write!(f, "{}", setting)
            }
            Error::Transport(details) => {
                write!(f, "{}", details)
            }
            Error::Protocol(details) => {
                write!(f, "{}", details)
            }
        }
    }
}

/// Represents one or several settings that are missing or have an invalid value.
#[derive(Debug)]
pub struct Setting {
    /// One or several setting names.
    ///
    /// * When a specific setting is invalid its value is the exact setting name.
    /// * When several settings are invalid, its value is the names wrapped in round brackets
    ///   (e.g. `(bucket_id,bucket_name)`).
    pub names: String,
    /// A human friendly message that explains why the setting(s) are invalid.
    pub msg: String,
}

impl Setting {
    fn new(names: &str, msg: &str) -> Self {
        Setting {
            names: String::from(names),
            msg: String::from(msg),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} settings have invalid values. {}", self.names, self.msg)
    }
}

/// Represents a request that didn't complete successfully at the HTTP level.
#[derive(Debug)]
pub struct Transport {
    /// A human friendly message to provide context of the error.
    pub ctx_msg: String,
    /// The HTTP status of the response. It's `None` when no response was received.
    pub status: Option<u16>,
    /// The error reported by the remote API in the response body, if the body could be decoded.
    pub api_error: Option<ApiError>,
    /// The inner error that caused this error, if any.
    inner: Option<BoxError>,
}

impl Transport {
    /// Returns `true` when the remote API answered that the resource doesn't exist.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.api_error {
            Some(api) => write!(f, "{}. {}", self.ctx_msg, api),
            None => write!(f, "{}", self.ctx_msg),
        }
    }
}

impl stderr::Error for Transport {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        self.inner
            .as_ref()
            .map(|e| e.as_ref() as &(dyn stderr::Error + 'static))
    }
}

/// The error body that the remote API returns along with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ApiError {
    /// A short code identifying the kind of error (e.g. `bad_request`, `not_found`).
    pub code: String,
    /// A human readable message.
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, r#"code: "{}", message: "{}""#, self.code, self.message)
    }
}

/// Describes why a response body isn't the one that the remote API must return.
#[derive(Debug)]
pub enum Protocol {
    /// The body isn't valid JSON.
    InvalidJson {
        /// The call which returned the body.
        call: Call,
        /// The details reported by the JSON parser.
        details: String,
    },
    /// The body is valid JSON but its top level value isn't an object.
    NotAnObject {
        /// The call which returned the body.
        call: Call,
    },
    /// The JSON object doesn't have a required field or its value is `null`.
    MissingField {
        /// The call which returned the body.
        call: Call,
        /// The name of the missing field.
        field: &'static str,
    },
    /// The field exists but its value isn't of the expected JSON type.
    InvalidField {
        /// The call which returned the body.
        call: Call,
        /// The name of the field.
        field: &'static str,
    },
    /// The field is a string but not an absolute HTTP(S) URL.
    InvalidUrl {
        /// The call which returned the body.
        call: Call,
        /// The name of the field.
        field: &'static str,
        /// Why the value isn't a valid URL.
        details: String,
    },
    /// The field doesn't echo back the value sent with the request or the configured one.
    UnexpectedValue {
        /// The call which returned the body.
        call: Call,
        /// The name of the field.
        field: &'static str,
        /// The value that the field should have.
        expected: String,
        /// The value that the field has.
        found: String,
    },
}

impl Protocol {
    /// Returns the call whose response violated the protocol.
    pub fn call(&self) -> Call {
        match self {
            Self::InvalidJson { call, .. }
            | Self::NotAnObject { call }
            | Self::MissingField { call, .. }
            | Self::InvalidField { call, .. }
            | Self::InvalidUrl { call, .. }
            | Self::UnexpectedValue { call, .. } => *call,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let (code, details) = match self {
            Self::InvalidJson { details, .. } => ("invalid JSON", details.clone()),
            Self::NotAnObject { .. } => (
                "not an object",
                String::from("the top level JSON value must be an object"),
            ),
            Self::MissingField { field, .. } => {
                ("missing field", format!("expected field {}", field))
            }
            Self::InvalidField { field, .. } => {
                ("invalid field", format!("field {} must be a string", field))
            }
            Self::InvalidUrl { field, details, .. } => (
                "invalid URL",
                format!("field {} must be an absolute HTTP(S) URL. {}", field, details),
            ),
            Self::UnexpectedValue {
                field,
                expected,
                found,
                ..
            } => (
                "unexpected value",
                format!(
                    "expected field {} to have the value {:?}, found {:?}",
                    field, expected, found
                ),
            ),
        };

        write!(
            f,
            r#"call: "{}", code: "{}", details: "{}""#,
            self.call(),
            code,
            details
        )
    }
}
