//! The remote calls of the B2 native API used by this crate.

use std::fmt;

/// Path prefix shared by every call of the version of the API that this crate speaks.
pub const API_PATH: &str = "/b2api/v1/";

/// Identifies each remote call that the [`Client`](crate::Client) performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// Exchanges the account credentials for a session.
    AuthorizeAccount,
    /// Obtains a single-use URL for uploading one file to a bucket.
    GetUploadUrl,
    /// Uploads the content of a file.
    UploadFile,
    /// Downloads the content of a file by its ID.
    DownloadFileById,
    /// Returns the information of a file by its ID.
    GetFileInfo,
    /// Deletes a version of a file.
    DeleteFileVersion,
}

impl Call {
    /// All the calls, in the order of the API documentation.
    pub const ALL: [Call; 6] = [
        Call::AuthorizeAccount,
        Call::GetUploadUrl,
        Call::UploadFile,
        Call::DownloadFileById,
        Call::GetFileInfo,
        Call::DeleteFileVersion,
    ];

    /// Returns the name of the call in the remote API.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthorizeAccount => "b2_authorize_account",
            Self::GetUploadUrl => "b2_get_upload_url",
            Self::UploadFile => "b2_upload_file",
            Self::DownloadFileById => "b2_download_file_by_id",
            Self::GetFileInfo => "b2_get_file_info",
            Self::DeleteFileVersion => "b2_delete_file_version",
        }
    }

    /// Returns the URL of the call under `base_url`.
    ///
    /// The URL of [`Call::UploadFile`] isn't built by clients, it's returned by
    /// [`Call::GetUploadUrl`].
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            API_PATH,
            self.name()
        )
    }

    /// Returns the keys that a successful response body must contain. It's empty for
    /// [`Call::DownloadFileById`] because its body is the raw file content.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            Self::AuthorizeAccount => &["apiUrl", "authorizationToken", "accountId", "downloadUrl"],
            Self::GetUploadUrl => &["bucketId", "authorizationToken", "uploadUrl"],
            Self::UploadFile | Self::GetFileInfo | Self::DeleteFileVersion => {
                &["fileId", "fileName"]
            }
            Self::DownloadFileById => &[],
        }
    }

    /// Identifies the call that `url` targets, looking for the API path followed by the name of
    /// the call.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split('?').next().unwrap_or(url);
        Self::ALL.into_iter().find(|call| {
            let needle = format!("{}{}", API_PATH, call.name());
            path.ends_with(&needle) || path.contains(&format!("{}/", needle))
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_url() {
        assert_eq!(
            Call::GetUploadUrl.url("https://api001.backblazeb2.com"),
            "https://api001.backblazeb2.com/b2api/v1/b2_get_upload_url",
        );
        assert_eq!(
            Call::DeleteFileVersion.url("https://api001.backblazeb2.com/"),
            "https://api001.backblazeb2.com/b2api/v1/b2_delete_file_version",
            "trailing slash of the base URL",
        );
    }

    #[test]
    fn test_from_url() {
        for call in Call::ALL {
            assert_eq!(
                Call::from_url(&call.url("https://example.test")),
                Some(call),
                "{}",
                call
            );
        }

        assert_eq!(
            Call::from_url("https://d.example.test/b2api/v1/b2_download_file_by_id?fileId=4_z1"),
            Some(Call::DownloadFileById),
            "query string",
        );
        assert_eq!(
            Call::from_url("https://pod.example.test/b2api/v1/b2_upload_file/buck-1/c001"),
            Some(Call::UploadFile),
            "upload URL with bucket segments",
        );
        assert_eq!(
            Call::from_url("https://pod.example.test/b2api/v1/b2_upload_files"),
            None,
            "unknown call"
        );
    }

    #[test]
    fn test_required_keys() {
        assert_eq!(
            Call::AuthorizeAccount.required_keys(),
            &["apiUrl", "authorizationToken", "accountId", "downloadUrl"],
        );
        assert!(Call::DownloadFileById.required_keys().is_empty());
    }
}
