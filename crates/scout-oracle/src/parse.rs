//! Extraction of a username list from free-form oracle replies.

use scout_core::AdapterError;

/// Turns an oracle reply into an ordered list of usernames.
pub trait RankingParser: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AdapterError::RankingParse`] when no list can be extracted.
    fn parse(&self, reply: &str) -> Result<Vec<String>, AdapterError>;
}

/// Takes the text from the first `[` through the first `]` after it and
/// decodes it as a JSON array of strings. Anything around the brackets is
/// ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketListParser;

impl RankingParser for BracketListParser {
    fn parse(&self, reply: &str) -> Result<Vec<String>, AdapterError> {
        let start = reply
            .find('[')
            .ok_or_else(|| AdapterError::RankingParse("no '[' in reply".to_owned()))?;
        let len = reply[start..]
            .find(']')
            .ok_or_else(|| AdapterError::RankingParse("no ']' after '[' in reply".to_owned()))?;
        let slice = &reply[start..=start + len];

        serde_json::from_str::<Vec<String>>(slice)
            .map_err(|e| AdapterError::RankingParse(format!("{slice}: {e}")))
    }
}
