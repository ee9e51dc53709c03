//! Azure Data Lake Storage Gen2 connector settings (Hadoop ABFS keys).
//!
//! Keys live under `fs.azure.`. Any key can be narrowed to one storage
//! account by appending the account host, e.g.
//! `fs.azure.account.key.myaccount.dfs.core.windows.net`.

use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use super::{Backend, ConnectorConfig};
use crate::constants::{
    AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, AZURE_STORAGE_ACCOUNT_KEY, AZURE_STORAGE_SAS_TOKEN,
};
use crate::resolve::{FromConfigValue, KeyLayout, ResolveError, Resolver, SettingSpec};

pub const LAYOUT: KeyLayout = KeyLayout::Suffix {
    prefix: "fs.azure.",
    host_suffix: ".dfs.core.windows.net",
};

pub const AUTH_TYPE: SettingSpec = SettingSpec {
    name: "auth type",
    suffix: "account.auth.type",
    default: Some("SharedKey"),
    env: None,
    secret: false,
};
pub const ACCOUNT_KEY: SettingSpec = SettingSpec {
    name: "account key",
    suffix: "account.key",
    default: None,
    env: Some(AZURE_STORAGE_ACCOUNT_KEY),
    secret: true,
};
pub const SAS_TOKEN: SettingSpec = SettingSpec {
    name: "SAS token",
    suffix: "sas.fixed.token",
    default: None,
    env: Some(AZURE_STORAGE_SAS_TOKEN),
    secret: true,
};
pub const CLIENT_ID: SettingSpec = SettingSpec {
    name: "OAuth client id",
    suffix: "account.oauth2.client.id",
    default: None,
    env: Some(AZURE_CLIENT_ID),
    secret: false,
};
pub const CLIENT_SECRET: SettingSpec = SettingSpec {
    name: "OAuth client secret",
    suffix: "account.oauth2.client.secret",
    default: None,
    env: Some(AZURE_CLIENT_SECRET),
    secret: true,
};
/// Token endpoint, e.g. `https://login.microsoftonline.com/<tenant>/oauth2/token`.
pub const CLIENT_ENDPOINT: SettingSpec = SettingSpec {
    name: "OAuth token endpoint",
    suffix: "account.oauth2.client.endpoint",
    default: None,
    env: None,
    secret: false,
};
pub const ENDPOINT_SUFFIX: SettingSpec = SettingSpec {
    name: "endpoint suffix",
    suffix: "endpoint.suffix",
    default: Some("core.windows.net"),
    env: None,
    secret: false,
};
pub const MAX_RETRIES: SettingSpec = SettingSpec {
    name: "max retries",
    suffix: "io.retry.max.retries",
    default: Some("30"),
    env: None,
    secret: false,
};

/// Every ABFS setting, in display order.
pub const SETTINGS: &[SettingSpec] = &[
    AUTH_TYPE,
    ACCOUNT_KEY,
    SAS_TOKEN,
    CLIENT_ID,
    CLIENT_SECRET,
    CLIENT_ENDPOINT,
    ENDPOINT_SUFFIX,
    MAX_RETRIES,
];

/// How the connector authenticates against the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum AbfsAuthType {
    #[default]
    SharedKey,
    OAuth,
    #[strum(serialize = "SAS")]
    Sas,
}

impl FromConfigValue for AbfsAuthType {
    const EXPECTED: &'static str = "auth type (SharedKey, OAuth, SAS)";

    fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError> {
        raw.parse().map_err(|_| ResolveError::Parse {
            key: key.to_string(),
            value: raw.to_string(),
            expected: Self::EXPECTED,
        })
    }
}

/// Client-credentials grant for OAuth auth.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_endpoint: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// Resolved ABFS configuration for one storage account (or globally).
#[derive(Clone)]
pub struct AbfsConfig {
    account: Option<String>,
    auth_type: AbfsAuthType,
    account_key: Option<String>,
    sas_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    client_endpoint: Option<String>,
    endpoint_suffix: String,
    max_retries: i32,
}

impl ConnectorConfig for AbfsConfig {
    const BACKEND: Backend = Backend::Abfs;

    fn from_resolver(resolver: &Resolver<'_>) -> Result<Self, ResolveError> {
        Ok(Self {
            account: resolver.scope().map(str::to_string),
            auth_type: resolver.require(&AUTH_TYPE)?,
            account_key: resolver.get(&ACCOUNT_KEY)?,
            sas_token: resolver.get(&SAS_TOKEN)?,
            client_id: resolver.get(&CLIENT_ID)?,
            client_secret: resolver.get(&CLIENT_SECRET)?,
            client_endpoint: resolver.get(&CLIENT_ENDPOINT)?,
            endpoint_suffix: resolver.require(&ENDPOINT_SUFFIX)?,
            max_retries: resolver.require(&MAX_RETRIES)?,
        })
    }
}

impl AbfsConfig {
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn auth_type(&self) -> AbfsAuthType {
        self.auth_type
    }

    pub fn account_key(&self) -> Option<&str> {
        self.account_key.as_deref()
    }

    pub fn sas_token(&self) -> Option<&str> {
        self.sas_token.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn client_endpoint(&self) -> Option<&str> {
        self.client_endpoint.as_deref()
    }

    pub fn endpoint_suffix(&self) -> &str {
        &self.endpoint_suffix
    }

    pub fn max_retries(&self) -> i32 {
        self.max_retries
    }

    /// Azure storage connection string for shared-key auth.
    pub fn connection_string(&self) -> Result<String, ResolveError> {
        let account = self
            .account
            .as_deref()
            .ok_or_else(|| ResolveError::missing("storage account"))?;
        let key = self
            .account_key
            .as_deref()
            .ok_or_else(|| ResolveError::missing(self.key_for(&ACCOUNT_KEY)))?;
        Ok(format!(
            "DefaultEndpointsProtocol=https;AccountName={account};AccountKey={key};EndpointSuffix={}",
            self.endpoint_suffix
        ))
    }

    /// Client credentials for OAuth auth; every field is required.
    pub fn oauth_credentials(&self) -> Result<OAuthCredentials, ResolveError> {
        let need = |value: &Option<String>, spec: &SettingSpec| {
            value
                .clone()
                .ok_or_else(|| ResolveError::missing(self.key_for(spec)))
        };
        Ok(OAuthCredentials {
            client_id: need(&self.client_id, &CLIENT_ID)?,
            client_secret: need(&self.client_secret, &CLIENT_SECRET)?,
            token_endpoint: need(&self.client_endpoint, &CLIENT_ENDPOINT)?,
        })
    }

    fn key_for(&self, spec: &SettingSpec) -> String {
        match &self.account {
            Some(account) => LAYOUT.scoped_key(spec.suffix, account),
            None => LAYOUT.key(spec.suffix),
        }
    }
}

impl fmt::Debug for AbfsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbfsConfig")
            .field("account", &self.account)
            .field("auth_type", &self.auth_type)
            .field("account_key", &self.account_key.as_ref().map(|_| "[REDACTED]"))
            .field("sas_token", &self.sas_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("client_endpoint", &self.client_endpoint)
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
