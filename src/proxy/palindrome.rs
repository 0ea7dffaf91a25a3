use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalindromeVerdict {
    pub normalized: String,
    pub is_palindrome: bool,
}

/// Lowercase and keep only ASCII letters and digits
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn check(input: &str) -> PalindromeVerdict {
    let normalized = normalize(input);
    let is_palindrome = normalized.bytes().eq(normalized.bytes().rev());

    PalindromeVerdict {
        normalized,
        is_palindrome,
    }
}

impl fmt::Display for PalindromeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_palindrome {
            write!(f, "Result: '{}' is a palindrome!", self.normalized)
        } else {
            write!(f, "Result: '{}' is not a palindrome.", self.normalized)
        }
    }
}
