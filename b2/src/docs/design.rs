//! # Implementation design
//!
//! ## Errors
//!
//! All the public functions and methods of this crate that can return an error, they return this
//! specific [`Result` type](crate::Result).
//!
//! [`Error`](crate::Error) is an `enum` which each variant is of a certain type. Each of these
//! types expose different information accordingly to what they represent:
//!
//! * [`Error::Configuration`](crate::Error::Configuration): a setting is missing or invalid. It's
//!   always returned before sending any request.
//! * [`Error::Transport`](crate::Error::Transport): a request couldn't be completed or the
//!   remote API answered with a non-success HTTP status. When the remote API sent its error body,
//!   it's available in [`error::Transport::api_error`](crate::error::Transport::api_error).
//! * [`Error::Protocol`](crate::Error::Protocol): the remote API answered successfully but the
//!   body isn't a JSON object, a required field is missing, or a field doesn't echo back the
//!   value that it must have (account ID, bucket ID, file ID or file name).
//!
//! Errors are never recovered internally. A multi-step operation which fails in the middle leaves
//! the remote side as it is; for example, an upload whose response doesn't echo back the file name
//! returns an error although the file may have been stored.
//!
//! ### Panics
//!
//! This crate never panics explicitly, it returns errors as mentioned.
//!
//! ## Sessions
//!
//! The remote API requires three steps: authorizing the account, which returns a session
//! (API URL, download URL and token), obtaining a single-use upload URL when uploading, and
//! performing the operation.
//!
//! Sessions aren't cached across public operations, each one authorizes the account again, so
//! there isn't any token expiration to detect. A session is only shared by the calls of a single
//! operation: [`Client::delete`](crate::Client::delete) looks up the file name and deletes the
//! file with the same session.
//!
//! Upload targets are consumed by the upload, so the type system guarantees that they are used at
//! most once.
//!
//! ## Responses validation
//!
//! Every response status is checked first; any non-success status is a transport error. The JSON
//! bodies are then parsed into an object, required keys are checked for presence (a `null` value
//! counts as absent), and echoed values are compared byte by byte. The returned API, download
//! and upload URLs must be absolute HTTP(S) URLs; otherwise it's a protocol error and no request
//! is sent to them. The body of a download isn't parsed, it's returned verbatim.
//!
//! ## Transport
//!
//! The client builds requests and delegates sending them to an
//! [`HttpClient`](crate::http::HttpClient). The default one,
//! [`ReqwestClient`](crate::http::ReqwestClient), is blocking and applies the user agent and the
//! timeout of the [`Config`](crate::Config). The `fake::FakeServer`, enabled by the `fake` cargo
//! feature, implements it in memory.
