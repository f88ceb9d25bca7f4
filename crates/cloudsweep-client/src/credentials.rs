//! Account credentials used to authenticate every Admin API call.

use std::fmt;

use crate::{Error, Result};

/// API key, API secret and cloud name of a Cloudinary account.
///
/// All three values are required. They are validated once at construction
/// and are read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    cloud_name: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::ErrorKind::Configuration) error
    /// naming the first value that is empty or only whitespace.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        cloud_name: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            cloud_name: cloud_name.into(),
        };

        for (name, value) in [
            ("api_key", &credentials.api_key),
            ("api_secret", &credentials.api_secret),
            ("cloud_name", &credentials.cloud_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!("missing credential: {name}")));
            }
        }

        Ok(credentials)
    }

    /// Returns the API key (basic auth user name).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the API secret (basic auth password).
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Returns the cloud name that scopes every request path.
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("cloud_name", &self.cloud_name)
            .finish()
    }
}
