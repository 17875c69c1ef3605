#![allow(dead_code)]

use contact_links::{ContactStore, Hosts, Settings};
use mongodb::{Client, Database};
use std::time::{SystemTime, UNIX_EPOCH};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::mongo::Mongo;

pub const PRODUCT_ID: i64 = 300023344;

pub fn settings_for(database: &str) -> Settings {
    Settings {
        host: Hosts::One("localhost:27017".to_string()),
        username: String::new(),
        password: String::new(),
        replica_set: None,
        database: database.to_string(),
        contacts_collection: "associatedContacts".to_string(),
        links_collection: "contactsLinks".to_string(),
        counters_collection: "counters".to_string(),
        connect_timeout_secs: None,
        operation_timeout_secs: None,
        log_level: "debug".to_string(),
    }
}

fn unique_database_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string();
    format!("contact_links_test_{}", &nanos[nanos.len().saturating_sub(12)..])
}

pub struct TestContext {
    pub store: ContactStore,
    db: Database,
    _container: Option<ContainerAsync<Mongo>>,
}

impl TestContext {
    /// Uses the server named by `MONGODB_URL` when set, otherwise starts a
    /// throwaway mongo container. Each context gets its own database.
    pub async fn new() -> Self {
        let (url, container) = match std::env::var("MONGODB_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = Mongo::default()
                    .start()
                    .await
                    .expect("start mongo container");
                let host = container.get_host().await.expect("mongo container host");
                let port = container
                    .get_host_port_ipv4(27017)
                    .await
                    .expect("mongo container port");
                (format!("mongodb://{}:{}/", host, port), Some(container))
            }
        };
        let client = Client::with_uri_str(url).await.expect("valid mongo url");
        let name = unique_database_name();
        let db = client.database(&name);
        let store = ContactStore::from_database(db.clone(), &settings_for(&name));
        Self {
            store,
            db,
            _container: container,
        }
    }

    pub async fn cleanup(self) {
        self.db.drop().await.expect("drop test database");
    }
}

/// A store whose client never reaches a server; only calls that fail before
/// any I/O (or that time out) are meaningful against it.
pub async fn offline_store(operation_timeout_secs: Option<u64>) -> ContactStore {
    let client = Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=30000")
        .await
        .expect("parse offline uri");
    let mut settings = settings_for("offline");
    settings.operation_timeout_secs = operation_timeout_secs;
    ContactStore::from_database(client.database("offline"), &settings)
}
