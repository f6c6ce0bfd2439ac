use thiserror::Error;

/// A failed call to the remote calendar service.
///
/// `status` is set when the service answered with an HTTP error; it is `None`
/// for network failures and unparseable responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", self.describe())]
pub struct RemoteError {
    pub status: Option<u16>,
    pub method: String,
    pub url: String,
    pub message: String,
}

impl RemoteError {
    pub fn http(status: u16, method: &str, url: &str, message: impl Into<String>) -> Self {
        RemoteError {
            status: Some(status),
            method: method.to_string(),
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(method: &str, url: &str, message: impl Into<String>) -> Self {
        RemoteError {
            status: None,
            method: method.to_string(),
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// "METHOD url", the request that failed.
    pub fn request(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("{} returned {}: {}", self.request(), status, self.message),
            None => format!("{} failed: {}", self.request(), self.message),
        }
    }
}
