mod helpers;

use contact_links::{ContactStore, Error, Hosts, Link};
use helpers::{PRODUCT_ID, offline_store, settings_for};
use mongodb::bson::{Document, doc};
use std::time::Duration;

#[tokio::test]
async fn empty_arguments_are_rejected_before_touching_the_store() {
    let store = offline_store(None).await;

    assert!(matches!(
        store.insert(&Document::new()).await,
        Err(Error::InvalidArgument("contact"))
    ));
    assert!(matches!(
        store.update_contacts(Document::new(), doc! { "$set": { "a": 1 } }, None).await,
        Err(Error::InvalidArgument("condition"))
    ));
    assert!(matches!(
        store.update_contacts(doc! { "internal_id": 1 }, Document::new(), None).await,
        Err(Error::InvalidArgument("update"))
    ));
    assert!(matches!(
        store.add_link(0, 2, PRODUCT_ID).await,
        Err(Error::InvalidArgument("id1"))
    ));
    assert!(matches!(
        store.add_link(1, 0, PRODUCT_ID).await,
        Err(Error::InvalidArgument("id2"))
    ));
    assert!(matches!(
        store.get_real_link(1, 0).await,
        Err(Error::InvalidArgument("id2"))
    ));
    assert!(matches!(
        store.get_link_data(1, 0).await,
        Err(Error::InvalidArgument("product_id"))
    ));
    assert!(matches!(
        store.delete_many_links(1, &[]).await,
        Err(Error::InvalidArgument("internal_ids"))
    ));
    assert!(matches!(
        store.delete_many_links(0, &[2]).await,
        Err(Error::InvalidArgument("internal_id"))
    ));
    assert!(matches!(
        store.delete_link(0, 0).await,
        Err(Error::InvalidArgument("id1"))
    ));
    assert!(matches!(
        store.delete_contact_node(Document::new()).await,
        Err(Error::InvalidArgument("query"))
    ));
    assert!(matches!(
        store.delete_contact_nodes(Document::new()).await,
        Err(Error::InvalidArgument("query"))
    ));
    assert!(matches!(
        store.find_links(Document::new(), None).await,
        Err(Error::InvalidArgument("query"))
    ));
    assert!(matches!(
        store.get_next_sequence_value("").await,
        Err(Error::InvalidArgument("sequence_name"))
    ));

    let link = Link {
        id: None,
        id1: 1,
        id2: 2,
        product_id: PRODUCT_ID,
        db_link_exist: true,
        extra: Document::new(),
    };
    assert!(matches!(
        store.update_link(&link, Document::new()).await,
        Err(Error::InvalidArgument("fields"))
    ));
}

#[tokio::test]
async fn operation_timeout_surfaces_as_typed_error() {
    let store = offline_store(Some(1)).await;
    let err = store
        .find_one(doc! { "internal_id": 1 }, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(limit) if limit == Duration::from_secs(1)));
    assert_eq!(err.code(), 504);
}

#[tokio::test]
async fn unreachable_store_is_a_connection_failure() {
    let mut settings = settings_for("offline");
    settings.host = Hosts::One("127.0.0.1:1".to_string());
    settings.connect_timeout_secs = Some(1);

    let err = ContactStore::connect(&settings).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionFailure(_)));
    assert!(!err.is_not_found());
}
