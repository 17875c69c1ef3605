use crate::types::link::{Link, LinkPair};
use handle_errors::Error as CustomError;
use mongodb::bson::{Document, doc};

pub fn require_id(value: i64, argument: &'static str) -> Result<i64, CustomError> {
    if value == 0 {
        tracing::warn!(argument, "rejected zero id");
        return Err(CustomError::InvalidArgument(argument));
    }
    Ok(value)
}

pub fn require_document<'a>(
    value: &'a Document,
    argument: &'static str,
) -> Result<&'a Document, CustomError> {
    if value.is_empty() {
        tracing::warn!(argument, "rejected empty document");
        return Err(CustomError::InvalidArgument(argument));
    }
    Ok(value)
}

/// Matches a link joining `a` and `b`, whichever way round it was stored.
pub fn either_orientation(a: i64, b: i64) -> Document {
    doc! {
        "$or": [
            { "id1": a, "id2": b },
            { "id1": b, "id2": a },
        ]
    }
}

/// Matches the exact stored `(product_id, id1, id2)` triple.
pub fn exact_link(link: &Link) -> Document {
    doc! {
        "product_id": link.product_id,
        "id1": link.id1,
        "id2": link.id2,
    }
}

/// Matches any link of `product_id` with `id` at either endpoint.
pub fn touching(id: i64, product_id: i64) -> Document {
    doc! {
        "$or": [
            { "id1": id },
            { "id2": id },
        ],
        "product_id": product_id,
    }
}

/// Matches links between `id` and any member of `others`, in both directions.
pub fn between_one_and_many(id: i64, others: &[i64]) -> Document {
    doc! {
        "$or": [
            { "id1": id, "id2": { "$in": others } },
            { "id1": { "$in": others }, "id2": id },
        ]
    }
}

pub fn link_upsert(pair: LinkPair, product_id: i64) -> Document {
    doc! {
        "$set": {
            "id1": pair.id1,
            "id2": pair.id2,
            "product_id": product_id,
            "db_link_exist": true,
        }
    }
}
