//! Amazon S3 connector settings (Hadoop S3A keys).
//!
//! Keys live under `fs.s3a.` and may be narrowed to a bucket as
//! `fs.s3a.bucket.<bucket>.<suffix>`. Credentials, endpoint and retry
//! settings can also come from the standard AWS environment variables,
//! which win over any configured value.

use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use super::{Backend, ConnectorConfig};
use crate::constants::{
    AWS_ACCESS_KEY_ID, AWS_ENDPOINT, AWS_MAX_ATTEMPTS, AWS_RETRY_MODE, AWS_SECRET_ACCESS_KEY,
    AWS_SESSION_TOKEN,
};
use crate::resolve::{ConfigDuration, FromConfigValue, KeyLayout, ResolveError, Resolver, SettingSpec};

static REGION_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(
        r"^(?:https?://)?(?:[^/]*\.)?s3[.-](?:dualstack\.)?([a-z0-9-]+)\.amazonaws\.com(?:\.cn)?/?$",
    )
    .unwrap()
});

pub const LAYOUT: KeyLayout = KeyLayout::Infix {
    prefix: "fs.s3a.",
    segment: "bucket",
};

/// Static access key id.
pub const ACCESS_KEY: SettingSpec = SettingSpec {
    name: "access key",
    suffix: "access.key",
    default: None,
    env: Some(AWS_ACCESS_KEY_ID),
    secret: true,
};
/// Static secret access key.
pub const SECRET_KEY: SettingSpec = SettingSpec {
    name: "secret key",
    suffix: "secret.key",
    default: None,
    env: Some(AWS_SECRET_ACCESS_KEY),
    secret: true,
};
/// Session token for temporary credentials.
pub const SESSION_TOKEN: SettingSpec = SettingSpec {
    name: "session token",
    suffix: "session.token",
    default: None,
    env: Some(AWS_SESSION_TOKEN),
    secret: true,
};
pub const ENDPOINT: SettingSpec = SettingSpec {
    name: "endpoint",
    suffix: "endpoint",
    default: Some(""),
    env: Some(AWS_ENDPOINT),
    secret: false,
};
pub const ENDPOINT_REGION: SettingSpec = SettingSpec {
    name: "endpoint region",
    suffix: "endpoint.region",
    default: None,
    env: None,
    secret: false,
};
pub const SSL_ENABLED: SettingSpec = SettingSpec {
    name: "use SSL",
    suffix: "connection.ssl.enabled",
    default: Some("false"),
    env: None,
    secret: false,
};
/// Path style access; the inverse of virtual-host addressing.
pub const PATH_STYLE_ACCESS: SettingSpec = SettingSpec {
    name: "path style access",
    suffix: "path.style.access",
    default: Some("false"),
    env: None,
    secret: false,
};
pub const MAX_ATTEMPTS: SettingSpec = SettingSpec {
    name: "max retry attempts",
    suffix: "retry.limit",
    default: None,
    env: Some(AWS_MAX_ATTEMPTS),
    secret: false,
};
pub const RETRY_MODE: SettingSpec = SettingSpec {
    name: "retry mode",
    suffix: "retry.mode",
    default: Some("legacy"),
    env: Some(AWS_RETRY_MODE),
    secret: false,
};
pub const MAX_CONNECTIONS: SettingSpec = SettingSpec {
    name: "max connections",
    suffix: "connection.maximum",
    default: Some("15"),
    env: None,
    secret: false,
};
pub const CONNECT_TIMEOUT: SettingSpec = SettingSpec {
    name: "connect timeout",
    suffix: "connection.timeout",
    default: Some("200s"),
    env: None,
    secret: false,
};
pub const INSTANCE_CREDENTIALS: SettingSpec = SettingSpec {
    name: "use instance credentials",
    suffix: "instance.credentials",
    default: Some("false"),
    env: None,
    secret: false,
};
pub const IAM_ROLE: SettingSpec = SettingSpec {
    name: "IAM role",
    suffix: "iam.role",
    default: None,
    env: None,
    secret: false,
};
pub const IAM_ROLE_SESSION_NAME: SettingSpec = SettingSpec {
    name: "IAM role session name",
    suffix: "iam.role.session.name",
    default: Some("gluten-session"),
    env: None,
    secret: false,
};
pub const USE_PROXY_FROM_ENV: SettingSpec = SettingSpec {
    name: "use proxy from env",
    suffix: "use.proxy.from.env",
    default: Some("false"),
    env: None,
    secret: false,
};
pub const CREDENTIALS_PROVIDER: SettingSpec = SettingSpec {
    name: "credentials provider",
    suffix: "aws.credentials.provider",
    default: None,
    env: None,
    secret: false,
};

/// Every S3 setting, in display order.
pub const SETTINGS: &[SettingSpec] = &[
    ACCESS_KEY,
    SECRET_KEY,
    SESSION_TOKEN,
    ENDPOINT,
    ENDPOINT_REGION,
    SSL_ENABLED,
    PATH_STYLE_ACCESS,
    MAX_ATTEMPTS,
    RETRY_MODE,
    MAX_CONNECTIONS,
    CONNECT_TIMEOUT,
    INSTANCE_CREDENTIALS,
    IAM_ROLE,
    IAM_ROLE_SESSION_NAME,
    USE_PROXY_FROM_ENV,
    CREDENTIALS_PROVIDER,
];

/// AWS SDK retry strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RetryMode {
    #[default]
    Legacy,
    Standard,
    Adaptive,
}

impl FromConfigValue for RetryMode {
    const EXPECTED: &'static str = "retry mode (legacy, standard, adaptive)";

    fn from_config_value(key: &str, raw: &str) -> Result<Self, ResolveError> {
        raw.parse()
            .map_err(|_| ResolveError::Parse {
                key: key.to_string(),
                value: raw.to_string(),
                expected: Self::EXPECTED,
            })
    }
}

impl PartialEq<&str> for RetryMode {
    fn eq(&self, other: &&str) -> bool {
        self.as_ref() == *other
    }
}

/// Static credentials pair, with an optional session token.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolved S3 configuration for one bucket (or globally).
#[derive(Clone)]
pub struct S3Config {
    bucket: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    session_token: Option<String>,
    endpoint: String,
    endpoint_region: Option<String>,
    use_ssl: bool,
    path_style_access: bool,
    max_attempts: Option<i32>,
    retry_mode: RetryMode,
    max_connections: i32,
    connect_timeout: ConfigDuration,
    use_instance_credentials: bool,
    iam_role: Option<String>,
    iam_role_session_name: String,
    use_proxy_from_env: bool,
    credentials_provider: Option<String>,
}

impl ConnectorConfig for S3Config {
    const BACKEND: Backend = Backend::S3;

    fn from_resolver(resolver: &Resolver<'_>) -> Result<Self, ResolveError> {
        Ok(Self {
            bucket: resolver.scope().map(str::to_string),
            access_key: resolver.get(&ACCESS_KEY)?,
            secret_key: resolver.get(&SECRET_KEY)?,
            session_token: resolver.get(&SESSION_TOKEN)?,
            endpoint: resolver.require(&ENDPOINT)?,
            endpoint_region: resolver.get(&ENDPOINT_REGION)?,
            use_ssl: resolver.require(&SSL_ENABLED)?,
            path_style_access: resolver.require(&PATH_STYLE_ACCESS)?,
            max_attempts: resolver.get(&MAX_ATTEMPTS)?,
            retry_mode: resolver.require(&RETRY_MODE)?,
            max_connections: resolver.require(&MAX_CONNECTIONS)?,
            connect_timeout: resolver.require(&CONNECT_TIMEOUT)?,
            use_instance_credentials: resolver.require(&INSTANCE_CREDENTIALS)?,
            iam_role: resolver.get(&IAM_ROLE)?,
            iam_role_session_name: resolver.require(&IAM_ROLE_SESSION_NAME)?,
            use_proxy_from_env: resolver.require(&USE_PROXY_FROM_ENV)?,
            credentials_provider: resolver.get(&CREDENTIALS_PROVIDER)?,
        })
    }
}

impl S3Config {
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// Virtual-host style addressing (`bucket.host`) unless path style
    /// access was requested.
    pub fn use_virtual_addressing(&self) -> bool {
        !self.path_style_access
    }

    pub fn max_attempts(&self) -> Option<i32> {
        self.max_attempts
    }

    pub fn retry_mode(&self) -> RetryMode {
        self.retry_mode
    }

    pub fn max_connections(&self) -> i32 {
        self.max_connections
    }

    pub fn connect_timeout(&self) -> &ConfigDuration {
        &self.connect_timeout
    }

    pub fn use_instance_credentials(&self) -> bool {
        self.use_instance_credentials
    }

    pub fn iam_role(&self) -> Option<&str> {
        self.iam_role.as_deref()
    }

    pub fn iam_role_session_name(&self) -> &str {
        &self.iam_role_session_name
    }

    pub fn use_proxy_from_env(&self) -> bool {
        self.use_proxy_from_env
    }

    pub fn credentials_provider(&self) -> Option<&str> {
        self.credentials_provider.as_deref()
    }

    /// The signing region.
    ///
    /// An explicit `endpoint.region` wins; otherwise the region is read out
    /// of a standard AWS endpoint such as `s3.us-west-2.amazonaws.com`.
    pub fn region(&self) -> Option<String> {
        if let Some(region) = &self.endpoint_region {
            return Some(region.clone());
        }
        parse_aws_region(&self.endpoint)
    }

    /// Static credentials, if configured.
    ///
    /// Errors when only one half of the access/secret pair is present.
    pub fn credentials(&self) -> Result<Option<S3Credentials>, ResolveError> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Ok(Some(S3Credentials {
                access_key: access.clone(),
                secret_key: secret.clone(),
                session_token: self.session_token.clone(),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ResolveError::missing(self.key_for(&SECRET_KEY))),
            (None, Some(_)) => Err(ResolveError::missing(self.key_for(&ACCESS_KEY))),
        }
    }

    fn key_for(&self, spec: &SettingSpec) -> String {
        match &self.bucket {
            Some(bucket) => LAYOUT.scoped_key(spec.suffix, bucket),
            None => LAYOUT.key(spec.suffix),
        }
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key.as_ref().map(|_| "[REDACTED]"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("endpoint_region", &self.endpoint_region)
            .field("use_ssl", &self.use_ssl)
            .field("path_style_access", &self.path_style_access)
            .field("max_attempts", &self.max_attempts)
            .field("retry_mode", &self.retry_mode)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("use_instance_credentials", &self.use_instance_credentials)
            .field("iam_role", &self.iam_role)
            .field("iam_role_session_name", &self.iam_role_session_name)
            .field("use_proxy_from_env", &self.use_proxy_from_env)
            .field("credentials_provider", &self.credentials_provider)
            .finish()
    }
}

/// Extract the region from a standard AWS S3 endpoint.
pub fn parse_aws_region(endpoint: &str) -> Option<String> {
    REGION_RE
        .captures(endpoint.trim())
        .map(|caps| caps[1].to_string())
}
