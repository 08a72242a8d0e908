//! Redaction wrapper for private keys.
//!
//! Keys travel from `keys.txt` through [`AccountRequest`](crate::types::AccountRequest)
//! into the local signer. Wrapping them in [`Redacted`] keeps them out of
//! `Debug`/`Display` output, so a stray `?request` in a log line prints
//! `<redacted>` instead of the key.

use std::fmt::{self, Debug, Display};

const REDACTED: &str = "<redacted>";

/// Wrapper that hides its inner value when formatted or serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Callers must not log the result.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Redacted<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> serde::Serialize for Redacted<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        REDACTED.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_debug_and_display_hide_key() {
        let secret = Redacted::new(KEY.to_string());
        assert_eq!(format!("{:?}", secret), "<redacted>");
        assert_eq!(format!("{}", secret), "<redacted>");
    }

    #[test]
    fn test_serialize_hides_key() {
        let secret = Redacted::new(KEY.to_string());
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"<redacted>\"");
    }

    #[test]
    fn test_expose_returns_inner() {
        let secret: Redacted<String> = KEY.to_string().into();
        assert_eq!(secret.expose(), KEY);
    }
}
