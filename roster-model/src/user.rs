use crate::ids::UserId;
use crate::role::Role;

/// A directory record as returned by the server.
///
/// Records are replaced wholesale on every fetch; nothing in the client
/// mutates one in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub phone: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub role: Option<Role>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub salary: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_active: Option<bool>,
}

impl UserRecord {
    /// "Name Surname", trimmed when either part is blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    /// Case-insensitive email comparison used to resolve identities.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: UserId(1),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            email: "Ada@Example.com".into(),
            phone: None,
            role: Some(Role::Admin),
            salary: None,
            is_active: None,
        }
    }

    #[test]
    fn email_match_ignores_case() {
        assert!(record().email_matches("ada@example.COM"));
        assert!(!record().email_matches("ada@example.org"));
    }

    #[test]
    fn full_name_joins_parts() {
        assert_eq!(record().full_name(), "Ada Lovelace");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_optional_fields_deserialize() {
        let json = r#"{"id":3,"name":"A","surname":"B","email":"a@b.c"}"#;
        let parsed: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, UserId(3));
        assert_eq!(parsed.role, None);
        assert_eq!(parsed.phone, None);
    }
}
