use std::fmt;

use serde::{Deserialize, Serialize};

/// Phone number in canonical string form, the identity key for drivers and riders.
///
/// Spreadsheet exports may hand back a phone as `5551234567`, `5551234567.0`
/// or `(555) 123-4567`; all three canonicalize to `5551234567`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub fn canonical(raw: &str) -> Self {
        let trimmed = raw.trim();
        let without_float = strip_integral_float_suffix(trimmed);
        let cleaned: String = without_float
            .chars()
            .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '(' | ')' | '.'))
            .collect();
        Self(cleaned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn strip_integral_float_suffix(value: &str) -> &str {
    let Some((head, tail)) = value.rsplit_once('.') else {
        return value;
    };
    let integral = !head.is_empty()
        && head.chars().all(|ch| ch.is_ascii_digit())
        && !tail.is_empty()
        && tail.chars().all(|ch| ch == '0');
    if integral { head } else { value }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Phone {
    fn from(raw: &str) -> Self {
        Self::canonical(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_forms_agree() {
        let expected = Phone::canonical("5551234567");
        assert_eq!(Phone::canonical("5551234567.0"), expected);
        assert_eq!(Phone::canonical(" (555) 123-4567 "), expected);
        assert_eq!(Phone::canonical("555.123.4567"), expected);
        assert_eq!(expected.as_str(), "5551234567");
    }

    #[test]
    fn blank_is_empty() {
        assert!(Phone::canonical("   ").is_empty());
    }
}
