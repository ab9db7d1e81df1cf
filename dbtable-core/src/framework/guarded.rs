use std::{fmt, ptr};

use serde::{de, Deserialize, Deserializer};

/// A secret string, such as a password.
///
/// The plaintext is never rendered by `Debug` and is only reachable through
/// [`GuardedString::access`], which lends it to a single callback.
/// The buffer is zeroed when the value is dropped.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct GuardedString {
    chars: Vec<u8>,
}

impl GuardedString {
    pub fn new(plain: impl Into<String>) -> Self {
        Self {
            chars: plain.into().into_bytes(),
        }
    }

    /// Lends the plaintext to the supplied callback
    pub fn access<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        // the buffer is only ever filled from a String
        f(std::str::from_utf8(&self.chars).unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Drop for GuardedString {
    fn drop(&mut self) {
        for b in self.chars.iter_mut() {
            // SAFETY: b is a valid, aligned and exclusive reference into the buffer.
            // The write is volatile so it is not optimised away before the free.
            unsafe { ptr::write_volatile(b, 0) };
        }
    }
}

impl fmt::Debug for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuardedString(\"********\")")
    }
}

impl From<&str> for GuardedString {
    fn from(plain: &str) -> Self {
        Self::new(plain)
    }
}

impl<'de> Deserialize<'de> for GuardedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // accept any scalar so numeric passwords survive yaml parsing
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Ok(Self::new(s)),
            serde_yaml::Value::Number(n) => Ok(Self::new(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(Self::new(b.to_string())),
            _ => Err(de::Error::custom("expected a string value for secret")),
        }
    }
}
