//! Integration tests for S3 settings resolution.
//!
//! These tests go through the public API the same way the `resolve`
//! command does: build a map, pick a scope, resolve.

use std::time::Duration;

use fsconf::backends::s3::{self, RetryMode};
use fsconf::backends::{Backend, ConnectorConfig, S3Config};
use fsconf::env::Env;
use fsconf::properties::{ConfigMap, with_namespace_stripped};
use fsconf::resolve::{ResolveError, SettingSpec, ValueSource};
use pretty_assertions::assert_eq;

fn spark_conf(pairs: &[(&str, &str)]) -> ConfigMap {
    pairs.iter().copied().collect()
}

// ---------------------------------------------------------------------------
// defaults
// ---------------------------------------------------------------------------

#[test]
fn empty_config_yields_defaults() {
    let s3 = S3Config::resolve(&ConfigMap::new(), None, &Env::empty()).unwrap();

    assert_eq!(s3.bucket(), None);
    assert_eq!(s3.access_key(), None);
    assert_eq!(s3.secret_key(), None);
    assert_eq!(s3.session_token(), None);
    assert_eq!(s3.endpoint(), "");
    assert!(!s3.use_ssl());
    assert!(s3.use_virtual_addressing());
    assert_eq!(s3.max_attempts(), None);
    assert_eq!(s3.retry_mode(), RetryMode::Legacy);
    assert_eq!(s3.max_connections(), 15);
    assert_eq!(s3.connect_timeout().as_str(), "200s");
    assert_eq!(s3.connect_timeout().as_duration(), Duration::from_secs(200));
    assert!(!s3.use_instance_credentials());
    assert_eq!(s3.iam_role(), None);
    assert_eq!(s3.iam_role_session_name(), "gluten-session");
    assert!(!s3.use_proxy_from_env());
    assert_eq!(s3.credentials_provider(), None);
    assert_eq!(s3.region(), None);
    assert!(s3.credentials().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// spark.hadoop.* keys
// ---------------------------------------------------------------------------

#[test]
fn spark_hadoop_keys_override_defaults() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.access.key", "AKIA"),
        ("spark.hadoop.fs.s3a.secret.key", "shhh"),
        ("spark.hadoop.fs.s3a.endpoint", "https://s3.us-west-2.amazonaws.com"),
        ("spark.hadoop.fs.s3a.connection.ssl.enabled", "true"),
        ("spark.hadoop.fs.s3a.path.style.access", "true"),
        ("spark.hadoop.fs.s3a.retry.limit", "7"),
        ("spark.hadoop.fs.s3a.retry.mode", "adaptive"),
        ("spark.hadoop.fs.s3a.connection.maximum", "128"),
        ("spark.hadoop.fs.s3a.connection.timeout", "30s"),
        ("spark.hadoop.fs.s3a.instance.credentials", "true"),
        ("spark.hadoop.fs.s3a.iam.role", "arn:aws:iam::123:role/reader"),
        ("spark.hadoop.fs.s3a.iam.role.session.name", "etl"),
        ("spark.hadoop.fs.s3a.use.proxy.from.env", "true"),
    ]);

    let s3 = S3Config::resolve(&conf, None, &Env::empty()).unwrap();

    assert_eq!(s3.access_key(), Some("AKIA"));
    assert_eq!(s3.secret_key(), Some("shhh"));
    assert_eq!(s3.endpoint(), "https://s3.us-west-2.amazonaws.com");
    assert!(s3.use_ssl());
    assert!(!s3.use_virtual_addressing());
    assert_eq!(s3.max_attempts(), Some(7));
    assert_eq!(s3.retry_mode(), RetryMode::Adaptive);
    assert_eq!(s3.max_connections(), 128);
    assert_eq!(s3.connect_timeout().as_duration(), Duration::from_secs(30));
    assert!(s3.use_instance_credentials());
    assert_eq!(s3.iam_role(), Some("arn:aws:iam::123:role/reader"));
    assert_eq!(s3.iam_role_session_name(), "etl");
    assert!(s3.use_proxy_from_env());
    assert_eq!(s3.region().as_deref(), Some("us-west-2"));

    let creds = s3.credentials().unwrap().unwrap();
    assert_eq!(creds.access_key, "AKIA");
    assert_eq!(creds.secret_key, "shhh");
    assert_eq!(creds.session_token, None);
}

#[test]
fn explicit_region_beats_endpoint_region() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.endpoint", "https://s3.us-west-2.amazonaws.com"),
        ("spark.hadoop.fs.s3a.endpoint.region", "eu-west-1"),
    ]);
    let s3 = S3Config::resolve(&conf, None, &Env::empty()).unwrap();
    assert_eq!(s3.region().as_deref(), Some("eu-west-1"));
}

#[test]
fn half_a_credential_pair_is_an_error() {
    let conf = spark_conf(&[("spark.hadoop.fs.s3a.bucket.foo.access.key", "AKIA")]);
    let s3 = S3Config::resolve(&conf, Some("foo"), &Env::empty()).unwrap();
    let err = s3.credentials().unwrap_err();
    assert_eq!(err.key(), "fs.s3a.bucket.foo.secret.key");
}

// ---------------------------------------------------------------------------
// environment overrides
// ---------------------------------------------------------------------------

#[test]
fn env_vars_override_config_and_revert_when_unset() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.retry.limit", "3"),
        ("spark.hadoop.fs.s3a.retry.mode", "standard"),
    ]);
    let base = Env::empty();
    let env = base
        .with_var("AWS_MAX_ATTEMPTS", "9")
        .with_var("AWS_RETRY_MODE", "adaptive");

    let s3 = S3Config::resolve(&conf, None, &env).unwrap();
    assert_eq!(s3.max_attempts(), Some(9));
    assert_eq!(s3.retry_mode(), RetryMode::Adaptive);

    let env = env.without_var("AWS_MAX_ATTEMPTS").without_var("AWS_RETRY_MODE");
    let s3 = S3Config::resolve(&conf, None, &env).unwrap();
    assert_eq!(s3.max_attempts(), Some(3));
    assert_eq!(s3.retry_mode(), RetryMode::Standard);
}

#[test]
fn endpoint_env_applies_to_every_bucket() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.endpoint", "http://global:9000"),
        ("spark.hadoop.fs.s3a.bucket.foo.endpoint", "http://foo:9000"),
    ]);
    let env = Env::from_vars([("AWS_ENDPOINT", "http://localstack:4566")]);

    for scope in [None, Some("foo"), Some("bar")] {
        let s3 = S3Config::resolve(&conf, scope, &env).unwrap();
        assert_eq!(s3.endpoint(), "http://localstack:4566", "scope {scope:?}");
    }
}

#[test]
fn env_credentials_are_picked_up() {
    let env = Env::from_vars([
        ("AWS_ACCESS_KEY_ID", "env-id"),
        ("AWS_SECRET_ACCESS_KEY", "env-secret"),
        ("AWS_SESSION_TOKEN", "env-token"),
    ]);
    let s3 = S3Config::resolve(&ConfigMap::new(), None, &env).unwrap();
    let creds = s3.credentials().unwrap().unwrap();
    assert_eq!(creds.access_key, "env-id");
    assert_eq!(creds.secret_key, "env-secret");
    assert_eq!(creds.session_token.as_deref(), Some("env-token"));
}

#[test]
fn unparsable_env_value_names_the_variable() {
    let env = Env::from_vars([("AWS_MAX_ATTEMPTS", "many")]);
    let err = S3Config::resolve(&ConfigMap::new(), None, &env).unwrap_err();
    match err {
        ResolveError::Parse { key, value, .. } => {
            assert_eq!(key, "AWS_MAX_ATTEMPTS");
            assert_eq!(value, "many");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn non_utf8_env_value_is_not_skipped() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let conf = spark_conf(&[("fs.s3a.endpoint", "from-config")]);
    let env = Env::from_vars([("AWS_ENDPOINT", OsString::from_vec(vec![0x66, 0xff, 0x6f]))]);
    let err = S3Config::resolve(&conf, Some("foo"), &env).unwrap_err();
    assert_eq!(err.key(), "AWS_ENDPOINT");
    assert!(err.to_string().contains("UTF-8"));
}

// ---------------------------------------------------------------------------
// per-bucket scope
// ---------------------------------------------------------------------------

#[test]
fn bucket_settings_override_global_ones() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.retry.limit", "10"),
        ("spark.hadoop.fs.s3a.bucket.foo.retry.limit", "1"),
        ("spark.hadoop.fs.s3a.endpoint", "http://global:9000"),
        ("spark.hadoop.fs.s3a.bucket.foo.endpoint", "http://foo:9000"),
        ("spark.hadoop.fs.s3a.bucket.foo.path.style.access", "true"),
    ]);

    let foo = S3Config::resolve(&conf, Some("foo"), &Env::empty()).unwrap();
    assert_eq!(foo.bucket(), Some("foo"));
    assert_eq!(foo.max_attempts(), Some(1));
    assert_eq!(foo.endpoint(), "http://foo:9000");
    assert!(!foo.use_virtual_addressing());

    let other = S3Config::resolve(&conf, Some("other"), &Env::empty()).unwrap();
    assert_eq!(other.max_attempts(), Some(10));
    assert_eq!(other.endpoint(), "http://global:9000");
    assert!(other.use_virtual_addressing());

    let global = S3Config::resolve(&conf, None, &Env::empty()).unwrap();
    assert_eq!(global.max_attempts(), Some(10));
}

#[test]
fn every_bucket_setting_overrides_its_global_value() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.access.key", "access"),
        ("spark.hadoop.fs.s3a.bucket.foo.access.key", "foo-access"),
        ("spark.hadoop.fs.s3a.secret.key", "secret"),
        ("spark.hadoop.fs.s3a.bucket.foo.secret.key", "foo-secret"),
        ("spark.hadoop.fs.s3a.endpoint", "endpoint"),
        ("spark.hadoop.fs.s3a.bucket.foo.endpoint", "foo-endpoint"),
        ("spark.hadoop.fs.s3a.connection.ssl.enabled", "true"),
        ("spark.hadoop.fs.s3a.bucket.foo.connection.ssl.enabled", "false"),
        ("spark.hadoop.fs.s3a.path.style.access", "true"),
        ("spark.hadoop.fs.s3a.bucket.foo.path.style.access", "false"),
        ("spark.hadoop.fs.s3a.retry.limit", "10"),
        ("spark.hadoop.fs.s3a.bucket.foo.retry.limit", "1"),
        ("spark.hadoop.fs.s3a.retry.mode", "adaptive"),
        ("spark.hadoop.fs.s3a.bucket.foo.retry.mode", "standard"),
        ("spark.hadoop.fs.s3a.connection.maximum", "8"),
        ("spark.hadoop.fs.s3a.bucket.foo.connection.maximum", "4"),
        ("spark.hadoop.fs.s3a.connection.timeout", "100s"),
        ("spark.hadoop.fs.s3a.bucket.foo.connection.timeout", "10s"),
        ("spark.hadoop.fs.s3a.instance.credentials", "true"),
        ("spark.hadoop.fs.s3a.bucket.foo.instance.credentials", "false"),
        ("spark.hadoop.fs.s3a.iam.role", "gluten"),
        ("spark.hadoop.fs.s3a.bucket.foo.iam.role", "foo-gluten"),
        ("spark.hadoop.fs.s3a.iam.role.session.name", "gluten-new-session"),
        ("spark.hadoop.fs.s3a.bucket.foo.iam.role.session.name", "foo-gluten-new-session"),
    ]);
    let env = Env::empty();

    let foo = S3Config::resolve(&conf, Some("foo"), &env).unwrap();
    assert_eq!(foo.access_key(), Some("foo-access"));
    assert_eq!(foo.secret_key(), Some("foo-secret"));
    assert_eq!(foo.endpoint(), "foo-endpoint");
    assert!(!foo.use_ssl());
    assert!(foo.use_virtual_addressing());
    assert_eq!(foo.max_attempts(), Some(1));
    assert_eq!(foo.retry_mode(), RetryMode::Standard);
    assert_eq!(foo.max_connections(), 4);
    assert_eq!(foo.connect_timeout().as_str(), "10s");
    assert!(!foo.use_instance_credentials());
    assert_eq!(foo.iam_role(), Some("foo-gluten"));
    assert_eq!(foo.iam_role_session_name(), "foo-gluten-new-session");

    for scope in [None, Some("bar")] {
        let global = S3Config::resolve(&conf, scope, &env).unwrap();
        assert_eq!(global.access_key(), Some("access"));
        assert_eq!(global.secret_key(), Some("secret"));
        assert_eq!(global.endpoint(), "endpoint");
        assert!(global.use_ssl());
        assert!(!global.use_virtual_addressing());
        assert_eq!(global.max_attempts(), Some(10));
        assert_eq!(global.retry_mode(), RetryMode::Adaptive);
        assert_eq!(global.max_connections(), 8);
        assert_eq!(global.connect_timeout().as_str(), "100s");
        assert!(global.use_instance_credentials());
        assert_eq!(global.iam_role(), Some("gluten"));
        assert_eq!(global.iam_role_session_name(), "gluten-new-session");
    }
}

#[test]
fn empty_scope_means_global() {
    let conf = spark_conf(&[("spark.hadoop.fs.s3a.bucket..retry.limit", "4")]);
    let s3 = S3Config::resolve(&conf, Some(""), &Env::empty()).unwrap();
    assert_eq!(s3.bucket(), None);
    assert_eq!(s3.max_attempts(), None);
}

#[test]
fn resolution_reports_each_origin() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.bucket.foo.retry.limit", "1"),
        ("fs.s3a.bucket.foo.connection.maximum", "2"),
        ("spark.hadoop.fs.s3a.endpoint", "http://minio:9000"),
        ("fs.s3a.iam.role", "reader"),
    ]);
    let env = Env::from_vars([("AWS_RETRY_MODE", "standard")]);
    let resolver = Backend::S3.resolver(&conf, &env).with_scope(Some("foo"));

    let source = |spec: &SettingSpec| resolver.lookup(spec).unwrap().map(|r| r.source);
    assert_eq!(
        source(&s3::MAX_ATTEMPTS),
        Some(ValueSource::ScopedAlias("spark.hadoop.fs.s3a.bucket.foo.retry.limit".into()))
    );
    assert_eq!(
        source(&s3::MAX_CONNECTIONS),
        Some(ValueSource::Scoped("fs.s3a.bucket.foo.connection.maximum".into()))
    );
    assert_eq!(
        source(&s3::ENDPOINT),
        Some(ValueSource::Alias("spark.hadoop.fs.s3a.endpoint".into()))
    );
    assert_eq!(
        source(&s3::IAM_ROLE),
        Some(ValueSource::Canonical("fs.s3a.iam.role".into()))
    );
    assert_eq!(
        source(&s3::RETRY_MODE),
        Some(ValueSource::Environment("AWS_RETRY_MODE".into()))
    );
    assert_eq!(source(&s3::CONNECT_TIMEOUT), Some(ValueSource::Default));
    assert_eq!(source(&s3::SESSION_TOKEN), None);
}

// ---------------------------------------------------------------------------
// namespace stripping
// ---------------------------------------------------------------------------

#[test]
fn stripped_namespace_resolves_identically() {
    let conf = spark_conf(&[
        ("spark.hadoop.fs.s3a.bucket.foo.retry.limit", "1"),
        ("spark.hadoop.fs.s3a.retry.limit", "10"),
        ("spark.hadoop.fs.s3a.endpoint", "http://minio:9000"),
        ("spark.executor.memory", "4g"),
    ]);
    let stripped = with_namespace_stripped(&conf, "spark.hadoop.");

    assert_eq!(stripped.get("fs.s3a.bucket.foo.retry.limit"), Some("1"));
    assert_eq!(stripped.get("spark.executor.memory"), Some("4g"));

    let env = Env::empty();
    for scope in [None, Some("foo")] {
        let direct = S3Config::resolve(&conf, scope, &env).unwrap();
        let via_stripped = S3Config::resolve(&stripped, scope, &env).unwrap();
        assert_eq!(direct.max_attempts(), via_stripped.max_attempts());
        assert_eq!(direct.endpoint(), via_stripped.endpoint());
    }
}

#[test]
fn validate_rejects_bad_values() {
    let conf = spark_conf(&[("spark.hadoop.fs.s3a.connection.ssl.enabled", "maybe")]);
    let env = Env::empty();
    let resolver = Backend::S3.resolver(&conf, &env);
    let err = Backend::S3.validate(&resolver).unwrap_err();
    assert_eq!(err.key(), "spark.hadoop.fs.s3a.connection.ssl.enabled");
}
