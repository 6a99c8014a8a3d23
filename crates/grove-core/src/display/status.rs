//! Status and confirmation messages.

use std::fmt;

/// Outcome message for operations without richer receipts.
pub struct OperationStatus {
    message: String,
    success: bool,
}

impl OperationStatus {
    /// A success message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// A failure message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            writeln!(f, "{}", self.message)
        } else {
            writeln!(f, "Error: {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_renders_plain() {
        let output = format!("{}", OperationStatus::success("Location updated"));
        assert_eq!(output, "Location updated\n");
    }

    #[test]
    fn failure_renders_with_prefix() {
        let output = format!("{}", OperationStatus::failure("no such plant"));
        assert_eq!(output, "Error: no such plant\n");
    }
}
