//! An in-memory stand-in for the remote API.
//!
//! [`FakeServer`] implements [`HttpClient`] answering the calls used by the
//! [`Client`](crate::Client) the same way that the remote API does for one account and one
//! bucket. It records every request it receives and can be told to alter the response of any
//! call, which allows to exercise clients and anything built on top of them without network
//! access.
//!
//! It's only compiled with the `fake` cargo feature.
//!
//! ```
//! use std::time::Duration;
//!
//! use b2::fake::FakeServer;
//! use b2::{Bucket, Client, Config, Credentials};
//!
//! let creds = Credentials::new("acct-1", "key-1");
//! let bucket = Bucket::new("buck-1", "bucket-name");
//! let server = FakeServer::new(&creds, &bucket);
//! let config =
//!     Config::with_authorize_url("b2-rust", Duration::from_secs(1), &FakeServer::authorize_url())
//!         .unwrap();
//!
//! let client = Client::with_http_client(creds, bucket, &config, &server);
//! let id = client.upload("testing.txt", b"hello world").unwrap();
//! assert_eq!(client.download(&id).unwrap(), b"hello world");
//! ```

use crate::api::Call;
use crate::http::{HttpClient, Method, Request, Response};
use crate::{Bucket, Credentials, Error, Result};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Map, Value};
use sha1::{Digest, Sha1};

/// Base URL returned as `apiUrl` by the account authorization.
pub const API_URL: &str = "https://api.fake.b2";
/// Base URL returned as `downloadUrl` by the account authorization.
pub const DOWNLOAD_URL: &str = "https://download.fake.b2";
/// Base URL of the upload URLs.
pub const UPLOAD_URL: &str = "https://pod.fake.b2";

/// An alteration of the response of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Tamper {
    /// Replaces the whole body.
    Body(Vec<u8>),
    /// Removes a key from the JSON object of the body.
    RemoveKey(&'static str),
    /// Inserts or replaces a key of the JSON object of the body.
    SetKey(&'static str, Value),
    /// Replaces the status code, keeping the body.
    Status(u16),
    /// Fails the request without any response, as if the network was down.
    Unreachable,
}

/// A file held by the [`FakeServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// The name of the file.
    pub name: String,
    /// The content of the file.
    pub data: Vec<u8>,
    /// The lowercase hexadecimal SHA-1 sent along with the content.
    pub sha1: String,
}

/// A response before being encoded, so tampers can alter JSON bodies.
enum Reply {
    Json(u16, Value),
    Raw(u16, Vec<u8>),
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, StoredFile>,
    session_tokens: HashSet<String>,
    upload_tokens: HashSet<String>,
    counter: u64,
    requests: Vec<Request>,
    tampers: HashMap<Call, Tamper>,
}

impl State {
    fn next(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }
}

/// See the [module documentation](self).
pub struct FakeServer {
    account_id: String,
    basic_authorization: String,
    bucket: Bucket,
    state: Mutex<State>,
}

impl FakeServer {
    /// Creates a server which accepts the credentials `creds` and holds the bucket `bucket`.
    pub fn new(creds: &Credentials, bucket: &Bucket) -> Self {
        Self {
            account_id: String::from(creds.account_id()),
            basic_authorization: creds.basic_authorization(),
            bucket: bucket.clone(),
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the URL that clients must use for authorizing the account.
    pub fn authorize_url() -> String {
        Call::AuthorizeAccount.url(API_URL)
    }

    /// Alters the responses of `call` with `tamper` until [`Self::reset_tampers`] is called. It
    /// replaces any previous tamper of the same call.
    pub fn tamper(&self, call: Call, tamper: Tamper) {
        self.lock().tampers.insert(call, tamper);
    }

    /// Removes all the tampers.
    pub fn reset_tampers(&self) {
        self.lock().tampers.clear();
    }

    /// Returns all the received requests, in the order that they were received.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Returns the received requests that target `call`.
    pub fn requests_of(&self, call: Call) -> Vec<Request> {
        self.lock()
            .requests
            .iter()
            .filter(|r| Call::from_url(&r.url) == Some(call))
            .cloned()
            .collect()
    }

    /// Returns the calls targeted by the received requests, in the order that they were received.
    pub fn calls(&self) -> Vec<Option<Call>> {
        self.lock()
            .requests
            .iter()
            .map(|r| Call::from_url(&r.url))
            .collect()
    }

    /// Returns the file identified by `file_id` if it's stored.
    pub fn file(&self, file_id: &str) -> Option<StoredFile> {
        self.lock().files.get(file_id).cloned()
    }

    /// Returns the number of stored files.
    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn authorize_account(&self, state: &mut State, req: &Request) -> Reply {
        if req.method != Method::Get {
            return api_error(405, "method_not_allowed", "only GET is allowed");
        }
        if req.header_value("Authorization") != Some(self.basic_authorization.as_str()) {
            return api_error(401, "unauthorized", "invalid account ID or application key");
        }

        let token = format!("session-{}", state.next());
        state.session_tokens.insert(token.clone());

        Reply::Json(
            200,
            json!({
                "accountId": self.account_id,
                "apiUrl": API_URL,
                "authorizationToken": token,
                "downloadUrl": DOWNLOAD_URL,
                "minimumPartSize": 5_000_000,
            }),
        )
    }

    fn get_upload_url(&self, state: &mut State, req: &Request) -> Reply {
        let body = json_body(req);
        let bucket_id = body.as_ref().and_then(|b| b.get("bucketId")).and_then(Value::as_str);
        if bucket_id != Some(self.bucket.id.as_str()) {
            return api_error(400, "bad_request", "invalid bucketId");
        }

        let n = state.next();
        let token = format!("upload-{}", n);
        state.upload_tokens.insert(token.clone());

        let upload_url = format!(
            "{}/b2api/v1/b2_upload_file/{}/c{:03}",
            UPLOAD_URL, self.bucket.id, n
        );

        Reply::Json(
            200,
            json!({
                "bucketId": self.bucket.id,
                "uploadUrl": upload_url,
                "authorizationToken": token,
            }),
        )
    }

    fn upload_file(&self, state: &mut State, req: &Request) -> Reply {
        // Upload tokens are valid for a single upload.
        let authorized = req
            .header_value("Authorization")
            .map(|t| state.upload_tokens.remove(t))
            .unwrap_or(false);
        if !authorized {
            return api_error(401, "bad_auth_token", "invalid upload authorization token");
        }

        let (Some(name), Some(sha1)) = (
            req.header_value("X-Bz-File-Name"),
            req.header_value("X-Bz-Content-Sha1"),
        ) else {
            return api_error(400, "bad_request", "missing file name or SHA-1 header");
        };

        let data = req.body.clone().unwrap_or_default();
        let computed = hex::encode(Sha1::digest(&data));
        if computed != sha1 {
            return api_error(400, "bad_request", "checksum did not match data received");
        }

        let file_id = format!("4_z{}_f{:06}", self.bucket.id, state.next());
        let file = StoredFile {
            name: String::from(name),
            data,
            sha1: computed,
        };
        let reply = Reply::Json(200, file_json(&file_id, &self.bucket.id, &file));
        state.files.insert(file_id, file);

        reply
    }

    fn download_file_by_id(&self, state: &State, req: &Request) -> Reply {
        let file_id = url::Url::parse(&req.url).ok().and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "fileId")
                .map(|(_, v)| v.into_owned())
        });

        match file_id.and_then(|id| state.files.get(&id)) {
            Some(file) => Reply::Raw(200, file.data.clone()),
            None => api_error(404, "not_found", "file not present"),
        }
    }

    fn get_file_info(&self, state: &State, req: &Request) -> Reply {
        let body = json_body(req);
        let file_id = body.as_ref().and_then(|b| b.get("fileId")).and_then(Value::as_str);

        match file_id.and_then(|id| state.files.get_key_value(id)) {
            Some((id, file)) => Reply::Json(200, file_json(id, &self.bucket.id, file)),
            None => api_error(404, "not_found", "file not present"),
        }
    }

    fn delete_file_version(&self, state: &mut State, req: &Request) -> Reply {
        let body = json_body(req);
        let field = |k: &str| {
            body.as_ref()
                .and_then(|b| b.get(k))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let (Some(file_id), Some(file_name)) = (field("fileId"), field("fileName")) else {
            return api_error(400, "bad_request", "fileId and fileName are required");
        };

        match state.files.get(&file_id) {
            Some(file) if file.name == file_name => {
                state.files.remove(&file_id);
                Reply::Json(200, json!({ "fileId": file_id, "fileName": file_name }))
            }
            Some(_) => api_error(400, "bad_request", "fileName does not match fileId"),
            None => api_error(400, "file_not_present", "file not present"),
        }
    }
}

impl HttpClient for FakeServer {
    fn execute(&self, request: Request) -> Result<Response> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let Some(call) = Call::from_url(&request.url) else {
            return Ok(encode(api_error(404, "not_found", "unknown endpoint")));
        };

        let tamper = state.tampers.get(&call).cloned();
        if tamper == Some(Tamper::Unreachable) {
            return Err(Error::new_transport(
                &format!("cannot send request to {}", request.url),
                "connection refused".into(),
            ));
        }

        let authorized = call == Call::AuthorizeAccount
            || call == Call::UploadFile
            || request
                .header_value("Authorization")
                .map(|t| state.session_tokens.contains(t))
                .unwrap_or(false);

        let reply = if !authorized {
            api_error(401, "bad_auth_token", "invalid authorization token")
        } else {
            match call {
                Call::AuthorizeAccount => self.authorize_account(&mut state, &request),
                Call::GetUploadUrl => self.get_upload_url(&mut state, &request),
                Call::UploadFile => self.upload_file(&mut state, &request),
                Call::DownloadFileById => self.download_file_by_id(&state, &request),
                Call::GetFileInfo => self.get_file_info(&state, &request),
                Call::DeleteFileVersion => self.delete_file_version(&mut state, &request),
            }
        };

        Ok(encode(match tamper {
            Some(t) => apply(t, reply),
            None => reply,
        }))
    }
}

fn json_body(req: &Request) -> Option<Map<String, Value>> {
    req.body
        .as_deref()
        .and_then(|b| serde_json::from_slice::<Value>(b).ok())
        .and_then(|v| match v {
            Value::Object(o) => Some(o),
            _ => None,
        })
}

fn file_json(file_id: &str, bucket_id: &str, file: &StoredFile) -> Value {
    json!({
        "fileId": file_id,
        "fileName": file.name,
        "bucketId": bucket_id,
        "contentLength": file.data.len(),
        "contentSha1": file.sha1,
        "contentType": "application/octet-stream",
        "action": "upload",
    })
}

fn api_error(status: u16, code: &str, message: &str) -> Reply {
    Reply::Json(
        status,
        json!({ "status": status, "code": code, "message": message }),
    )
}

fn apply(tamper: Tamper, reply: Reply) -> Reply {
    match (tamper, reply) {
        (Tamper::Body(body), Reply::Json(status, _) | Reply::Raw(status, _)) => {
            Reply::Raw(status, body)
        }
        (Tamper::Status(status), Reply::Json(_, v)) => Reply::Json(status, v),
        (Tamper::Status(status), Reply::Raw(_, b)) => Reply::Raw(status, b),
        (Tamper::RemoveKey(key), Reply::Json(status, mut v)) => {
            if let Some(o) = v.as_object_mut() {
                o.remove(key);
            }
            Reply::Json(status, v)
        }
        (Tamper::SetKey(key, value), Reply::Json(status, mut v)) => {
            if let Some(o) = v.as_object_mut() {
                o.insert(String::from(key), value);
            }
            Reply::Json(status, v)
        }
        (_, reply) => reply,
    }
}

fn encode(reply: Reply) -> Response {
    match reply {
        Reply::Json(status, v) => Response {
            status,
            body: v.to_string().into_bytes(),
        },
        Reply::Raw(status, body) => Response { status, body },
    }
}
