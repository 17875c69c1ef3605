use crate::types::contact::as_i64;
use handle_errors::Error as CustomError;
use mongodb::bson::{Bson, Document};

/// One document per named sequence in the counters collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub name: Bson,
    pub sequence: i64,
}

impl TryFrom<Document> for Counter {
    type Error = CustomError;

    /// Counters seeded from the shell hold a double; any integral number is accepted.
    fn try_from(stored: Document) -> Result<Self, Self::Error> {
        let sequence = stored
            .get("sequence")
            .and_then(as_i64)
            .ok_or_else(|| CustomError::MalformedRecord(format!("counter without integer sequence: {}", stored)))?;
        Ok(Self {
            name: stored.get("_id").cloned().unwrap_or(Bson::Null),
            sequence,
        })
    }
}
