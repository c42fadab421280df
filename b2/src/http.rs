//! HTTP transport used by the [`Client`](crate::Client).
//!
//! The client only builds [`Request`]s and reads [`Response`]s; sending them is delegated to an
//! [`HttpClient`], which allows to replace the network by something else, for example the
//! `fake::FakeServer` of the `fake` cargo feature.

use crate::{Config, Error, Result};

use std::sync::Arc;

/// HTTP methods used by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The method.
    pub method: Method,
    /// The absolute URL, including the query string.
    pub url: String,
    /// The headers, in the order that they were added.
    pub headers: Vec<(String, String)>,
    /// The body. Only POST requests have one.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a GET request without headers.
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: String::from(url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request without headers with `body`.
    pub fn post(url: &str, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: String::from(url),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((String::from(name), String::from(value)));
        self
    }

    /// Returns the value of the first header whose name matches `name` ignoring the ASCII case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The response of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The whole body.
    pub body: Vec<u8>,
}

impl Response {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests and waits for their whole response.
///
/// Implementations must return an [`Error::Transport`] when the request cannot be completed and
/// a [`Response`] for any status received, including the non-success ones.
pub trait HttpClient {
    /// Sends `request` and returns its response.
    fn execute(&self, request: Request) -> Result<Response>;
}

impl<H: HttpClient + ?Sized> HttpClient for &H {
    fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request)
    }
}

impl<H: HttpClient + ?Sized> HttpClient for Arc<H> {
    fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request)
    }
}

/// An [`HttpClient`] which sends the requests over the network.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client which applies the user agent and the timeout of `config` to every
    /// request.
    pub fn new(config: &Config) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|err| Error::new_transport("cannot build the HTTP client", err.into()))?;

        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn execute(&self, request: Request) -> Result<Response> {
        let mut builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().map_err(|err| {
            Error::new_transport(
                &format!("cannot send request to {}", request.url),
                err.into(),
            )
        })?;

        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(|err| {
            Error::new_transport(
                &format!("cannot read the response body of {}", request.url),
                err.into(),
            )
        })?;

        Ok(Response {
            status,
            body: body.to_vec(),
        })
    }
}
