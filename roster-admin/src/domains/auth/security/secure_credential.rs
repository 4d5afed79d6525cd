use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret text that is zeroed when dropped
///
/// Holds login passwords, new-user passwords typed into the form and bearer
/// tokens. Debug and Display never print the contents.
#[derive(Zeroize, ZeroizeOnDrop, Default)]
pub struct SecureCredential {
    data: String,
}

impl SecureCredential {
    pub fn new(data: String) -> Self {
        Self { data }
    }

    /// Borrow the secret.
    ///
    /// The returned slice points at memory that is zeroed on drop; do not
    /// keep it beyond the lifetime of the credential.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy with surrounding whitespace removed
    pub fn trimmed(&self) -> Self {
        Self {
            data: self.data.trim().to_string(),
        }
    }
}

impl Clone for SecureCredential {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl From<String> for SecureCredential {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for SecureCredential {
    fn from(data: &str) -> Self {
        Self::new(data.to_string())
    }
}

impl fmt::Debug for SecureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureCredential")
            .field("len", &self.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[SecureCredential: {} bytes]", self.len())
    }
}

impl PartialEq for SecureCredential {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.data.as_bytes() == other.data.as_bytes()
    }
}

impl Eq for SecureCredential {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_strips_whitespace_only_at_edges() {
        let credential = SecureCredential::from("  pa ss\t");
        assert_eq!(credential.trimmed().as_str(), "pa ss");
        assert_eq!(credential.as_str(), "  pa ss\t");
    }

    #[test]
    fn debug_and_display_never_print_the_secret() {
        let credential = SecureCredential::from("hunter2");
        let debug = format!("{:?}", credential);
        let display = format!("{}", credential);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!display.contains("hunter2"));
        assert!(display.contains("7 bytes"));
    }

    #[test]
    fn equality_compares_contents() {
        let a = SecureCredential::from("secret");
        let b = SecureCredential::from("secret".to_string());
        let c = SecureCredential::from("secreT");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, SecureCredential::from("secret!"));
    }
}
