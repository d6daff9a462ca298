//! Splitting input into verb, particles and noun phrases.

/// Words that separate or introduce noun phrases.
const PARTICLES: &[&str] = &["on", "with", "at", "in", "to", "from", "off", "into"];

/// Words dropped before resolution.
const ARTICLES: &[&str] = &["the", "a", "an"];

/// A tokenized sentence, before noun resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The first word, lowercased.
    pub verb: String,
    /// Particles in input order.
    pub particles: Vec<String>,
    /// Noun phrases in input order, articles removed.
    pub phrases: Vec<String>,
}

/// Split a line into a [`Sentence`]. Returns `None` for empty input.
pub fn split_sentence(input: &str) -> Option<Sentence> {
    let lowered = input.to_lowercase();
    let mut words = lowered
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '!' | '?'))
        .filter(|w| !w.is_empty());

    let verb = words.next()?.to_string();
    let mut particles = Vec::new();
    let mut phrases = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in words {
        if PARTICLES.contains(&word) {
            if !current.is_empty() {
                phrases.push(current.join(" "));
                current.clear();
            }
            particles.push(word.to_string());
        } else if !ARTICLES.contains(&word) {
            current.push(word);
        }
    }
    if !current.is_empty() {
        phrases.push(current.join(" "));
    }

    Some(Sentence {
        verb,
        particles,
        phrases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_phrases_on_particles() {
        let s = split_sentence("Cut the old rope with a knife.").unwrap();
        assert_eq!(s.verb, "cut");
        assert_eq!(s.particles, vec!["with"]);
        assert_eq!(s.phrases, vec!["old rope", "knife"]);
    }

    #[test]
    fn verb_alone() {
        let s = split_sentence("  z ").unwrap();
        assert_eq!(s.verb, "z");
        assert!(s.phrases.is_empty());
        assert!(s.particles.is_empty());
    }

    #[test]
    fn empty_is_none() {
        assert!(split_sentence("").is_none());
        assert!(split_sentence(" ,. ").is_none());
    }
}
