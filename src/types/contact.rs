use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

/// Contacts are schemaless; only `internal_id` and `product_id` carry
/// meaning for this crate.
pub type Contact = Document;

/// Domain-level lookup key of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactKey {
    pub internal_id: i64,
    pub product_id: i64,
}

impl ContactKey {
    pub fn new(internal_id: i64, product_id: i64) -> Self {
        Self {
            internal_id,
            product_id,
        }
    }

    pub fn filter(&self) -> Document {
        doc! {
            "internal_id": self.internal_id,
            "product_id": self.product_id,
        }
    }

    /// Reads the key back out of a stored contact, accepting any integer width.
    pub fn from_contact(contact: &Contact) -> Option<Self> {
        let internal_id = as_i64(contact.get("internal_id")?)?;
        let product_id = as_i64(contact.get("product_id")?)?;
        Some(Self::new(internal_id, product_id))
    }
}

pub(crate) fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}
