//! # Fixtures
//!
//! Randomized input payloads, generated fresh per invocation so repeated
//! suite runs never collide on identical data. The harness consumes the
//! capability through [`FixtureProvider`]; the rand-backed implementation
//! lives in [`faker`].

pub mod faker;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Minimum password length a generated credential must satisfy.
pub const MIN_PASSWORD_LEN: usize = 11;

/// Registration payload for auth-protected chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Kinds of fixture values the harness asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixtureKind {
    Credentials,
    TextSentence,
    TextParagraph,
}

/// Source of randomized valid inputs. Every call must return a fresh
/// independent value; implementations hold no state across calls.
pub trait FixtureProvider: Send + Sync {
    fn credentials(&self) -> Credentials;
    fn sentence(&self) -> String;
    fn paragraph(&self) -> String;

    fn generate(&self, kind: FixtureKind) -> Value {
        match kind {
            FixtureKind::Credentials => {
                let credentials = self.credentials();
                json!({
                    "email": credentials.email,
                    "password": credentials.password,
                })
            }
            FixtureKind::TextSentence => Value::String(self.sentence()),
            FixtureKind::TextParagraph => Value::String(self.paragraph()),
        }
    }
}
