//! Account credential configuration.

use std::fmt;

use anyhow::Context;
use clap::Args;
use cloudsweep_client::Credentials;

/// Cloudinary account credentials.
///
/// All three values are required; they are optional here only so that a
/// missing value is reported by [`CredentialsConfig::credentials`] rather
/// than by argument parsing.
#[derive(Clone, Args)]
pub struct CredentialsConfig {
    /// Cloudinary API key
    #[arg(long = "api-key", env = "CLOUDINARY_API_KEY")]
    pub api_key: Option<String>,

    /// Cloudinary API secret
    #[arg(long = "api-secret", env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Cloudinary cloud name
    #[arg(long = "cloud-name", env = "CLOUDINARY_CLOUD_NAME")]
    pub cloud_name: Option<String>,
}

impl CredentialsConfig {
    /// Builds validated credentials.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing value if any credential is absent
    /// or blank.
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        Credentials::new(
            self.api_key.clone().unwrap_or_default(),
            self.api_secret.clone().unwrap_or_default(),
            self.cloud_name.clone().unwrap_or_default(),
        )
        .context(
            "CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET and CLOUDINARY_CLOUD_NAME must all be set",
        )
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("cloud_name", &self.cloud_name)
            .finish()
    }
}
