//! Description of the test environment an application runs in.

use super::location::StubSourceLocation;

/// Variable whose presence marks a testing environment.
pub const TESTING_KEY: &str = "TESTING";

/// Whether the process runs under test, and where its stubs live.
///
/// Application code may take test-only paths when `testing` is set, such as
/// routing requests through a [`StubSession`](crate::recording::StubSession).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub testing: bool,
    pub stub_location: Option<StubSourceLocation>,
}

impl Environment {
    /// Build from caller supplied pairs.
    ///
    /// `TESTING` counts when present with any value. The stub location is set
    /// only when both `STUB_NAME` and `STUB_PATH` are present.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        Self {
            testing: vars.iter().any(|(k, _)| k == TESTING_KEY),
            stub_location: StubSourceLocation::from_vars(vars),
        }
    }
}
