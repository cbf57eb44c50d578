use rand::Rng;
use rand::distributions::Alphanumeric;

use super::{Credentials, FixtureProvider, MIN_PASSWORD_LEN};

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
    "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "veniam", "quis",
    "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip", "commodo",
];

/// Stateless rand-backed provider: lorem text, synthetic emails, alphanumeric
/// passwords of at least [`MIN_PASSWORD_LEN`] characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakerFixtures;

impl FakerFixtures {
    fn word(rng: &mut impl Rng) -> &'static str {
        LOREM[rng.gen_range(0..LOREM.len())]
    }

    fn sentence_with(rng: &mut impl Rng) -> String {
        let count = rng.gen_range(4..=9);
        let words: Vec<&str> = (0..count).map(|_| Self::word(rng)).collect();
        let mut sentence = String::new();
        if let Some(first) = words.first() {
            let mut chars = first.chars();
            if let Some(head) = chars.next() {
                sentence.push(head.to_ascii_uppercase());
                sentence.push_str(chars.as_str());
            }
        }
        for word in words.iter().skip(1) {
            sentence.push(' ');
            sentence.push_str(word);
        }
        sentence.push('.');
        sentence
    }
}

impl FixtureProvider for FakerFixtures {
    fn credentials(&self) -> Credentials {
        let mut rng = rand::thread_rng();
        let email = format!(
            "{}.{}{}@example.com",
            Self::word(&mut rng),
            Self::word(&mut rng),
            rng.gen_range(100..10_000),
        );
        let length = rng.gen_range(MIN_PASSWORD_LEN..=MIN_PASSWORD_LEN + 5);
        let password: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Credentials { email, password }
    }

    fn sentence(&self) -> String {
        Self::sentence_with(&mut rand::thread_rng())
    }

    fn paragraph(&self) -> String {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(3..=5);
        let sentences: Vec<String> = (0..count).map(|_| Self::sentence_with(&mut rng)).collect();
        sentences.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::fixtures::FixtureKind;

    use super::*;

    #[test]
    fn passwords_meet_minimum_length() {
        let fixtures = FakerFixtures;
        for _ in 0..50 {
            assert!(fixtures.credentials().password.len() >= MIN_PASSWORD_LEN);
        }
    }

    #[test]
    fn emails_have_an_address_shape() {
        let credentials = FakerFixtures.credentials();
        assert!(credentials.email.contains('@'));
        assert!(credentials.email.ends_with("example.com"));
    }

    #[test]
    fn values_are_fresh_per_call() {
        let fixtures = FakerFixtures;
        assert_ne!(fixtures.paragraph(), fixtures.paragraph());
        assert_ne!(fixtures.credentials(), fixtures.credentials());
    }

    #[test]
    fn sentences_are_capitalized_and_terminated() {
        let sentence = FakerFixtures.sentence();
        assert!(sentence.chars().next().unwrap().is_ascii_uppercase());
        assert!(sentence.ends_with('.'));
    }

    #[test]
    fn generate_matches_kind_shapes() {
        let fixtures = FakerFixtures;
        let credentials = fixtures.generate(FixtureKind::Credentials);
        assert!(credentials.get("email").is_some());
        assert!(credentials.get("password").is_some());
        assert!(matches!(fixtures.generate(FixtureKind::TextSentence), Value::String(_)));
        assert!(matches!(fixtures.generate(FixtureKind::TextParagraph), Value::String(_)));
    }
}
