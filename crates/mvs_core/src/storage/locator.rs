//! Object locators.
//!
//! A locator names a bucket and a key within it. Accepted forms:
//!
//! ```text
//! s3://bucket/path/to/key
//! https://bucket.s3.amazonaws.com/path/to/key
//! https://bucket.s3.eu-west-1.amazonaws.com/path/to/key
//! https://s3.amazonaws.com/bucket/path/to/key
//! https://s3.eu-west-1.amazonaws.com/bucket/path/to/key
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors parsing a locator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("Unsupported locator '{0}'")]
    Unsupported(String),

    #[error("Locator '{0}' has no bucket")]
    MissingBucket(String),

    #[error("Locator '{0}' has no key")]
    MissingKey(String),
}

/// Bucket + key address of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectLocator {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a locator URI.
    ///
    /// Path segments are percent-decoded. For `s3://` everything after the
    /// bucket is the key, query and fragment included; https locators drop
    /// both.
    pub fn parse(uri: &str) -> Result<Self, LocatorError> {
        let url = Url::parse(uri.trim()).map_err(|_| LocatorError::Unsupported(uri.to_string()))?;

        let (bucket, key) = match url.scheme() {
            "s3" => {
                let bucket = url.host_str().unwrap_or_default().to_string();
                let mut key = decode(url.path().trim_start_matches('/'));
                if let Some(query) = url.query() {
                    key.push('?');
                    key.push_str(&decode(query));
                }
                if let Some(fragment) = url.fragment() {
                    key.push('#');
                    key.push_str(&decode(fragment));
                }
                (bucket, key)
            }
            "https" | "http" => {
                let host = url.host_str().unwrap_or_default();
                if !host.ends_with(".amazonaws.com") {
                    return Err(LocatorError::Unsupported(uri.to_string()));
                }
                let path = url.path().trim_start_matches('/');

                if host.starts_with("s3.") || host.starts_with("s3-") {
                    // Path style: bucket is the first path segment
                    let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
                    (decode(bucket), decode(key))
                } else if let Some(pos) = host.find(".s3.").or_else(|| host.find(".s3-")) {
                    (host[..pos].to_string(), decode(path))
                } else {
                    return Err(LocatorError::Unsupported(uri.to_string()));
                }
            }
            _ => return Err(LocatorError::Unsupported(uri.to_string())),
        };

        if bucket.is_empty() {
            return Err(LocatorError::MissingBucket(uri.to_string()));
        }
        if key.is_empty() {
            return Err(LocatorError::MissingKey(uri.to_string()));
        }

        Ok(Self { bucket, key })
    }
}

/// Percent-decode, keeping the raw text when it is not valid UTF-8.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl FromStr for ObjectLocator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_s3_scheme() {
        let loc = ObjectLocator::parse("s3://media-in/raw/M1.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "raw/M1.json"));
        assert_eq!(loc.to_string(), "s3://media-in/raw/M1.json");
    }

    #[test]
    fn parses_virtual_hosted_url() {
        let loc =
            ObjectLocator::parse("https://media-in.s3.eu-west-1.amazonaws.com/raw/M1.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "raw/M1.json"));

        let loc = ObjectLocator::parse("https://media-in.s3.amazonaws.com/M1.json?v=2").unwrap();
        assert_eq!(loc.key, "M1.json");
    }

    #[test]
    fn parses_path_style_url() {
        let loc = ObjectLocator::parse("https://s3.amazonaws.com/media-in/raw/M1.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "raw/M1.json"));
    }

    #[test]
    fn rejects_incomplete_locators() {
        assert!(matches!(
            ObjectLocator::parse("s3://media-in"),
            Err(LocatorError::MissingKey(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("s3:///key"),
            Err(LocatorError::MissingBucket(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("ftp://host/file"),
            Err(LocatorError::Unsupported(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("https://example.com/a/b"),
            Err(LocatorError::Unsupported(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("not a locator"),
            Err(LocatorError::Unsupported(_))
        ));
    }

    #[test]
    fn decodes_percent_encoded_keys() {
        let loc =
            ObjectLocator::parse("https://media-in.s3.amazonaws.com/folder/my%20file.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "folder/my file.json"));

        let loc = ObjectLocator::parse("s3://media-in/raw/M1%2Bcc.json").unwrap();
        assert_eq!(loc.key, "raw/M1+cc.json");

        let loc = ObjectLocator::parse("https://s3.amazonaws.com/media-in/a%20b/c.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "a b/c.json"));
    }

    #[test]
    fn https_fragment_is_not_part_of_key() {
        let loc = ObjectLocator::parse("https://media-in.s3.amazonaws.com/raw/key.json#frag").unwrap();
        assert_eq!(loc.key, "raw/key.json");
    }

    #[test]
    fn s3_key_keeps_question_mark_and_hash() {
        let loc = ObjectLocator::parse("s3://media-in/a?b.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "a?b.json"));

        let loc = ObjectLocator::parse("s3://media-in/take#2.json").unwrap();
        assert_eq!(loc.key, "take#2.json");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let loc = ObjectLocator::parse("S3://media-in/key.json").unwrap();
        assert_eq!(loc, ObjectLocator::new("media-in", "key.json"));

        let loc = ObjectLocator::parse("HTTPS://media-in.s3.amazonaws.com/key.json").unwrap();
        assert_eq!(loc.key, "key.json");
    }
}
