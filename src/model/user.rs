use serde::{Deserialize, Serialize};

/// The locally stored user identity. Used for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub email: String,
}

impl UserIdentity {
    /// The part of the email before `@`
    pub fn handle(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Up to two uppercase initials taken from the handle's
    /// `.`/`_`/`-`-separated words (`sarah.chen@…` → `SC`).
    pub fn initials(&self) -> String {
        self.handle()
            .split(['.', '_', '-'])
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn greeting(&self) -> String {
        format!("Hello, {}", self.handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> UserIdentity {
        UserIdentity {
            email: email.into(),
        }
    }

    #[test]
    fn initials_from_handle_words() {
        assert_eq!(user("sarah.chen@company.com").initials(), "SC");
        assert_eq!(user("alex_rodriguez@company.com").initials(), "AR");
        assert_eq!(user("maria@company.com").initials(), "M");
        assert_eq!(user("a.b.c@x.io").initials(), "AB");
    }

    #[test]
    fn greeting_uses_handle() {
        assert_eq!(user("david@company.com").greeting(), "Hello, david");
    }
}
