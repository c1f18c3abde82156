use std::fmt::{self, Display, Formatter};

use validator::ValidateEmail;

#[derive(Debug, Clone)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Returns an instance of `CustomerEmail` if all conditions are met.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid email: email cannot be empty.".to_string());
        }

        // Django's EmailField stores at most 254 characters
        if trimmed.chars().count() > 254 {
            return Err("Invalid email: cannot be longer than 254 characters.".to_string());
        }

        if !trimmed.contains('@') {
            return Err("Invalid email: missing '@' character.".to_string());
        }

        if !trimmed.validate_email() {
            return Err(format!(
                "Invalid email: '{trimmed}' does not match the required format."
            ));
        }

        Ok(CustomerEmail(trimmed.to_string()))
    }
}

impl AsRef<str> for CustomerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
