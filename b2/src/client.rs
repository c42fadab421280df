//! B2 client.

use crate::api::Call;
use crate::error::Protocol;
use crate::http::{HttpClient, ReqwestClient, Request};
use crate::session::{Session, UploadTarget};
use crate::{validate, Bucket, Config, Credentials, Error, Result};

use secrecy::ExposeSecret;
use serde::Serialize;
use sha1::{Digest, Sha1};
use tracing::{debug, info, instrument};

/// Uploads, downloads and deletes the files of one bucket.
///
/// Each public method obtains a new session from the remote API, so a client can be shared by
/// several callers as long as its [`HttpClient`] can.
#[derive(Debug)]
pub struct Client<H = ReqwestClient> {
    credentials: Credentials,
    bucket: Bucket,
    authorize_url: String,
    http: H,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetUploadUrlBody<'a> {
    bucket_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetFileInfoBody<'a> {
    file_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFileVersionBody<'a> {
    file_id: &'a str,
    file_name: &'a str,
}

impl Client {
    /// Creates a client which sends the requests over the network applying the user agent and
    /// the timeout of `config`.
    ///
    /// Neither the credentials nor the bucket are checked until an operation is performed.
    pub fn new(credentials: Credentials, bucket: Bucket, config: &Config) -> Result<Self> {
        let http = ReqwestClient::new(config)?;
        Ok(Self::with_http_client(credentials, bucket, config, http))
    }
}

impl<H: HttpClient> Client<H> {
    /// Creates a client which sends the requests through `http`.
    ///
    /// Only the authorization URL of `config` is used; the user agent and the timeout are
    /// responsibility of `http`.
    pub fn with_http_client(
        credentials: Credentials,
        bucket: Bucket,
        config: &Config,
        http: H,
    ) -> Self {
        Self {
            credentials,
            bucket,
            authorize_url: String::from(config.authorize_url()),
            http,
        }
    }

    /// Returns the bucket that this client operates on.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Uploads `data` as a file named `name` and returns the ID that the remote API assigned to
    /// it.
    ///
    /// The remote API must echo back exactly the same name, otherwise it returns a protocol error
    /// and the uploaded file, if any, isn't removed.
    #[instrument(skip(self, data), fields(bucket = %self.bucket.name, size = data.len()))]
    pub fn upload(&self, name: &str, data: &[u8]) -> Result<String> {
        let session = self.authorize()?;
        let target = self.get_upload_target(&session)?;
        let hash = hex::encode(Sha1::digest(data));

        let (upload_url, token) = target.into_parts();
        let request = Request::post(&upload_url, data.to_vec())
            .header("Content-Type", "application/octet-stream")
            .header("Authorization", token.expose_secret())
            .header("X-Bz-File-Name", name)
            .header("X-Bz-Content-Sha1", &hash);

        let body = self.send(Call::UploadFile, request)?;
        let obj = validate::response(Call::UploadFile, &body)?;
        validate::require_value(Call::UploadFile, &obj, "fileName", name)?;
        let file_id = validate::string_field(Call::UploadFile, &obj, "fileId")?;

        info!(file_id, sha1 = %hash, "uploaded file");
        Ok(String::from(file_id))
    }

    /// Downloads the content of the file identified by `file_id`.
    ///
    /// The body of the response is returned verbatim.
    #[instrument(skip(self), fields(bucket = %self.bucket.name))]
    pub fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let session = self.authorize()?;

        let mut url = url::Url::parse(&Call::DownloadFileById.url(&session.download_url))
            .map_err(|err| {
                Error::Protocol(Protocol::InvalidUrl {
                    call: Call::AuthorizeAccount,
                    field: "downloadUrl",
                    details: err.to_string(),
                })
            })?;
        url.query_pairs_mut().append_pair("fileId", file_id);

        let request = Request::get(url.as_str()).header("Authorization", session.token());
        let data = self.send(Call::DownloadFileById, request)?;

        debug!(size = data.len(), "downloaded file");
        Ok(data)
    }

    /// Deletes the file identified by `file_id`.
    ///
    /// The name of the file is looked up first because the remote API requires both to delete it.
    /// The lookup and the deletion share the same session.
    #[instrument(skip(self), fields(bucket = %self.bucket.name))]
    pub fn delete(&self, file_id: &str) -> Result<()> {
        let session = self.authorize()?;
        let file_name = self.lookup_file_name(&session, file_id)?;

        let body = DeleteFileVersionBody {
            file_id,
            file_name: &file_name,
        };
        let obj = self.post_json(&session, Call::DeleteFileVersion, &body)?;
        validate::require_value(Call::DeleteFileVersion, &obj, "fileId", file_id)?;
        validate::require_value(Call::DeleteFileVersion, &obj, "fileName", &file_name)?;

        info!(file_name = %file_name, "deleted file");
        Ok(())
    }

    /// Returns the name of the file identified by `file_id`.
    #[instrument(skip(self), fields(bucket = %self.bucket.name))]
    pub fn file_name(&self, file_id: &str) -> Result<String> {
        let session = self.authorize()?;
        self.lookup_file_name(&session, file_id)
    }

    /// Authorizes the account and checks that the remote API authorized the configured one.
    fn authorize(&self) -> Result<Session> {
        let request = Request::get(&self.authorize_url)
            .header("Accept", "application/json")
            .header("Authorization", &self.credentials.basic_authorization());

        let body = self.send(Call::AuthorizeAccount, request)?;
        let obj = validate::response(Call::AuthorizeAccount, &body)?;
        validate::require_value(
            Call::AuthorizeAccount,
            &obj,
            "accountId",
            self.credentials.account_id(),
        )?;

        Ok(Session::new(
            String::from(validate::url_field(Call::AuthorizeAccount, &obj, "apiUrl")?),
            String::from(validate::url_field(
                Call::AuthorizeAccount,
                &obj,
                "downloadUrl",
            )?),
            String::from(validate::string_field(
                Call::AuthorizeAccount,
                &obj,
                "authorizationToken",
            )?),
        ))
    }

    /// Obtains the URL and token for uploading one file to the configured bucket.
    fn get_upload_target(&self, session: &Session) -> Result<UploadTarget> {
        let body = GetUploadUrlBody {
            bucket_id: &self.bucket.id,
        };
        let obj = self.post_json(session, Call::GetUploadUrl, &body)?;
        validate::require_value(Call::GetUploadUrl, &obj, "bucketId", &self.bucket.id)?;

        Ok(UploadTarget::new(
            String::from(validate::url_field(Call::GetUploadUrl, &obj, "uploadUrl")?),
            String::from(validate::string_field(
                Call::GetUploadUrl,
                &obj,
                "authorizationToken",
            )?),
        ))
    }

    fn lookup_file_name(&self, session: &Session, file_id: &str) -> Result<String> {
        let obj = self.post_json(session, Call::GetFileInfo, &GetFileInfoBody { file_id })?;
        validate::require_value(Call::GetFileInfo, &obj, "fileId", file_id)?;
        let file_name = validate::string_field(Call::GetFileInfo, &obj, "fileName")?;
        Ok(String::from(file_name))
    }

    /// POSTs `body` as JSON to `call` under the session API URL and returns the validated
    /// response object.
    fn post_json<B: Serialize>(
        &self,
        session: &Session,
        call: Call,
        body: &B,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| Error::new_transport("cannot encode the request body", err.into()))?;
        let request = Request::post(&call.url(&session.api_url), payload)
            .header("Content-Type", "application/json")
            .header("Authorization", session.token());

        let resp = self.send(call, request)?;
        validate::response(call, &resp)
    }

    /// Sends `request` and returns the body of a successful response.
    ///
    /// Non-success statuses are transport errors; their bodies aren't inspected further than
    /// decoding the remote API error, if present.
    fn send(&self, call: Call, request: Request) -> Result<Vec<u8>> {
        debug!(call = %call, url = %request.url, "sending request");

        let resp = self.http.execute(request)?;
        if !resp.is_success() {
            debug!(call = %call, status = resp.status, "request failed");
            return Err(Error::new_status(call, resp.status, &resp.body));
        }

        Ok(resp.body)
    }
}
