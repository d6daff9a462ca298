//! Fixed player-facing text.

/// Shown instead of any action in a dark place.
pub const DARKNESS: &str = "It is pitch black. You can't see a thing.";

/// Shown when a confirmation answer is neither yes nor no.
pub const DISAMBIGUATION: &str =
    "Your response defies binary interpretation. I'll take that as a 'no'.";

/// Shown for empty input.
pub const PARDON: &str = "I beg your pardon?";

/// The prompt for a missing direct object.
pub fn what(display_verb: &str) -> String {
    format!("{display_verb} what?")
}

/// The prompt for a missing indirect object.
pub fn with_what(display_verb: &str, direct: &str) -> String {
    format!("{display_verb} the {direct} with what?")
}

/// Shown when no handler claims a verb.
pub fn unknown_verb(verb: &str) -> String {
    if verb.is_empty() {
        PARDON.to_string()
    } else {
        format!("I don't know the word \"{verb}\".")
    }
}

/// Shown when the verb is known but the sentence shape is not.
pub fn partial_understanding(verb: &str) -> String {
    format!("I only understood you as far as wanting to {verb}.")
}
