//! Environment variable credentials provider.

use super::{AwsCredentials, CredentialsProvider};
use crate::error::{AuthenticationError, S3Error};
use async_trait::async_trait;
use std::env;

/// Environment variable holding the access key ID.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Credentials provider that reads from environment variables.
///
/// Variables are read on every call, so rotating the values in the process
/// environment takes effect on the next signed request.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialsProvider {
    /// Custom access key ID variable name.
    access_key_var: Option<String>,
    /// Custom secret key variable name.
    secret_key_var: Option<String>,
}

impl EnvCredentialsProvider {
    /// Create a new environment credentials provider with default variable names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with custom variable names.
    pub fn with_vars(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: Some(access_key_var.into()),
            secret_key_var: Some(secret_key_var.into()),
        }
    }

    fn access_key_var(&self) -> &str {
        self.access_key_var.as_deref().unwrap_or(AWS_ACCESS_KEY_ID)
    }

    fn secret_key_var(&self) -> &str {
        self.secret_key_var
            .as_deref()
            .unwrap_or(AWS_SECRET_ACCESS_KEY)
    }

    fn read_var(name: &str) -> Result<String, S3Error> {
        let value = env::var(name)
            .map_err(|_| S3Error::Authentication(AuthenticationError::CredentialsNotFound))?;

        if value.is_empty() {
            return Err(S3Error::Authentication(
                AuthenticationError::InvalidCredentials {
                    message: format!("{} is empty", name),
                },
            ));
        }

        Ok(value)
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, S3Error> {
        let access_key_id = Self::read_var(self.access_key_var())?;
        let secret_access_key = Self::read_var(self.secret_key_var())?;

        Ok(AwsCredentials::new(access_key_id, secret_access_key))
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}
