//! Yes/no answers to confirmation prompts.

/// How a raw answer line was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// "y" or "yes".
    Affirmative,
    /// "n" or "no".
    Negative,
    /// Anything else.
    Unrecognized,
}

impl Reply {
    /// Interpret a line. Case and surrounding whitespace are ignored.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Affirmative,
            "n" | "no" => Self::Negative,
            _ => Self::Unrecognized,
        }
    }
}

/// The decision handed back to a suspended handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Go ahead.
    Yes,
    /// Cancel.
    No,
}

impl From<Reply> for Confirmation {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Affirmative => Self::Yes,
            Reply::Negative | Reply::Unrecognized => Self::No,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers() {
        assert_eq!(Reply::parse("y"), Reply::Affirmative);
        assert_eq!(Reply::parse("  YES "), Reply::Affirmative);
        assert_eq!(Reply::parse("No"), Reply::Negative);
        assert_eq!(Reply::parse("maybe"), Reply::Unrecognized);
        assert_eq!(Reply::parse(""), Reply::Unrecognized);
        assert_eq!(Reply::parse("yes please"), Reply::Unrecognized);
    }

    #[test]
    fn unrecognized_counts_as_no() {
        assert_eq!(Confirmation::from(Reply::Unrecognized), Confirmation::No);
        assert_eq!(Confirmation::from(Reply::Affirmative), Confirmation::Yes);
    }
}
