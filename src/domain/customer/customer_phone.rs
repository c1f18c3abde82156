use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone)]
pub struct CustomerPhone(String);

impl CustomerPhone {
    /// Parses an optional phone number. Blank input means the customer has no phone.
    pub fn parse(s: Option<String>) -> Result<Option<Self>, String> {
        let Some(s) = s else {
            return Ok(None);
        };
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.chars().count() > 20 {
            return Err("Invalid phone: cannot be longer than 20 characters.".to_string());
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '-' | '(' | ')' | ' ');
        if !digits.chars().all(allowed) || !digits.chars().any(|c| c.is_ascii_digit()) {
            return Err(
                "Phone number must be in format: +1234567890 or 123-456-7890".to_string(),
            );
        }

        Ok(Some(Self(trimmed.to_string())))
    }
}

impl AsRef<str> for CustomerPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerPhone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
