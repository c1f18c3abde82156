use std::fmt;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct CustomerName(String);

impl CustomerName {
    /// Returns an instance of `CustomerName` if all conditions are met.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid customer name: cannot be empty or whitespace.".to_string());
        }

        if trimmed.graphemes(true).count() > 255 {
            return Err("Invalid customer name: cannot be longer than 255 characters.".to_string());
        }

        if trimmed.chars().any(char::is_control) {
            return Err("Invalid customer name: contains control characters.".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
