//! fsconf — Spark/Hadoop filesystem configuration resolution (library crate).
//!
//! Maps keys such as `spark.hadoop.fs.s3a.access.key` onto typed S3 and
//! ABFS connector settings, honouring per-bucket (or per-account) overrides
//! and whitelisted environment variables.
//!
//! ```no_run
//! use fsconf::backends::{ConnectorConfig, S3Config};
//! use fsconf::env::Env;
//! use fsconf::properties::ConfigMap;
//!
//! let config: ConfigMap = [("spark.hadoop.fs.s3a.bucket.foo.retry.limit", "1")]
//!     .into_iter()
//!     .collect();
//! let s3 = S3Config::resolve(&config, Some("foo"), &Env::real())?;
//! assert_eq!(s3.max_attempts(), Some(1));
//! # Ok::<(), fsconf::resolve::ResolveError>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod env;
pub mod output;
pub mod properties;
pub mod resolve;
