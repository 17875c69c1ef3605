use crate::types::contact::as_i64;
use handle_errors::Error as CustomError;
use mongodb::bson::{Bson, Document, oid::ObjectId};

/// An undirected edge between two contacts, scoped to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: Option<ObjectId>,
    pub id1: i64,
    pub id2: i64,
    pub product_id: i64,
    pub db_link_exist: bool,
    /// Fields merged in through `update_link`.
    pub extra: Document,
}

impl Link {
    pub fn pair(&self) -> LinkPair {
        LinkPair {
            id1: self.id1,
            id2: self.id2,
        }
    }

    /// True when the link joins `a` and `b`, in either orientation.
    pub fn connects(&self, a: i64, b: i64) -> bool {
        LinkPair::canonical(self.id1, self.id2) == LinkPair::canonical(a, b)
    }
}

impl TryFrom<Document> for Link {
    type Error = CustomError;

    fn try_from(mut stored: Document) -> Result<Self, Self::Error> {
        let mut take_i64 = |field: &'static str| {
            stored
                .remove(field)
                .as_ref()
                .and_then(as_i64)
                .ok_or_else(|| CustomError::MalformedRecord(format!("link without integer {}", field)))
        };
        let id1 = take_i64("id1")?;
        let id2 = take_i64("id2")?;
        let product_id = take_i64("product_id")?;
        // Non-ObjectId keys stay in `extra` so they survive a round trip
        let id = match stored.get_object_id("_id") {
            Ok(oid) => {
                stored.remove("_id");
                Some(oid)
            }
            Err(_) => None,
        };
        let db_link_exist = matches!(stored.remove("db_link_exist"), Some(Bson::Boolean(true)));

        Ok(Self {
            id,
            id1,
            id2,
            product_id,
            db_link_exist,
            extra: stored,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkPair {
    pub id1: i64,
    pub id2: i64,
}

impl LinkPair {
    /// Orders the endpoints so that `id1 <= id2`.
    pub fn canonical(a: i64, b: i64) -> Self {
        if a <= b {
            Self { id1: a, id2: b }
        } else {
            Self { id1: b, id2: a }
        }
    }
}
