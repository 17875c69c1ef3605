use crate::config::Settings;
use crate::types::contact::{Contact, ContactKey};
use crate::types::counter::Counter;
use crate::types::link::{Link, LinkPair};
use crate::utils::connection::{connection_uri, redacted_uri};
use crate::utils::filters::{
    between_one_and_many, either_orientation, exact_link, link_upsert, require_document,
    require_id, touching,
};
use handle_errors::Error as CustomError;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateOptions};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::{Client, Collection, Cursor, Database};
use std::future::IntoFuture;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Counts removed by [`ContactStore::clean_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub links_deleted: u64,
    pub contacts_deleted: u64,
}

#[derive(Debug, Clone)]
pub struct ContactStore {
    pub db: Database,
    contacts: Collection<Contact>,
    links: Collection<Document>,
    counters: Collection<Document>,
    operation_timeout: Option<Duration>,
}

impl ContactStore {
    /// Connects and pings the target database, so an unreachable or
    /// misconfigured store is reported here rather than on first use.
    #[instrument(skip(settings), fields(database = %settings.database))]
    pub async fn connect(settings: &Settings) -> Result<Self, CustomError> {
        let mut options = ClientOptions::parse(connection_uri(settings))
            .await
            .map_err(CustomError::ConnectionFailure)?;
        if let Some(timeout) = settings.connect_timeout() {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }
        let client = Client::with_options(options).map_err(CustomError::ConnectionFailure)?;
        let db = client.database(&settings.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(CustomError::ConnectionFailure)?;
        info!(uri = %redacted_uri(settings), "connected to contact store");

        Ok(Self::from_database(db, settings))
    }

    /// Wraps an already-open database handle.
    pub fn from_database(db: Database, settings: &Settings) -> Self {
        Self {
            contacts: db.collection::<Contact>(&settings.contacts_collection),
            links: db.collection::<Document>(&settings.links_collection),
            counters: db.collection::<Document>(&settings.counters_collection),
            operation_timeout: settings.operation_timeout(),
            db,
        }
    }

    async fn timed<T, F>(&self, call: F) -> Result<T, CustomError>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        let call = call.into_future();
        match self.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CustomError::Timeout(limit))?
                .map_err(CustomError::DbError),
            None => call.await.map_err(CustomError::DbError),
        }
    }

    /// Inserts one contact and returns the identifier assigned by the store.
    #[instrument(skip_all)]
    pub async fn insert(&self, contact: &Contact) -> Result<Bson, CustomError> {
        require_document(contact, "contact")?;
        let result = self.timed(self.contacts.insert_one(contact)).await?;
        debug!(inserted_id = %result.inserted_id, "contact inserted");
        Ok(result.inserted_id)
    }

    /// Lazily streams matching contacts; an empty query matches every contact.
    #[instrument(skip_all)]
    pub async fn find(
        &self,
        query: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Cursor<Contact>, CustomError> {
        self.timed(self.contacts.find(query).with_options(options))
            .await
    }

    /// Returns `None` on a miss; only store failures are errors.
    #[instrument(skip_all)]
    pub async fn find_one(
        &self,
        query: Document,
        options: impl Into<Option<FindOneOptions>>,
    ) -> Result<Option<Contact>, CustomError> {
        self.timed(self.contacts.find_one(query).with_options(options))
            .await
    }

    #[instrument(skip_all)]
    pub async fn count_contacts(&self, query: Document) -> Result<u64, CustomError> {
        self.timed(self.contacts.count_documents(query)).await
    }

    /// Applies `update` to every contact matching `condition`.
    #[instrument(skip_all)]
    pub async fn update_contacts(
        &self,
        condition: Document,
        update: Document,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<UpdateResult, CustomError> {
        require_document(&condition, "condition")?;
        require_document(&update, "update")?;
        let result = self
            .timed(self.contacts.update_many(condition, update).with_options(options))
            .await?;
        debug!(
            matched = result.matched_count,
            modified = result.modified_count,
            "contacts updated"
        );
        Ok(result)
    }

    /// Applies `update` to the first contact matching `condition`.
    #[instrument(skip_all)]
    pub async fn update_contact(
        &self,
        condition: Document,
        update: Document,
    ) -> Result<UpdateResult, CustomError> {
        require_document(&condition, "condition")?;
        require_document(&update, "update")?;
        self.timed(self.contacts.update_one(condition, update)).await
    }

    /// Creates or refreshes the link between `id1` and `id2`.
    ///
    /// The pair is stored in canonical order (`id1 <= id2`) and an existing
    /// link in either orientation is matched, so a later call with the
    /// reversed pair updates the same record. Two concurrent first-time
    /// calls for the same pair can still both insert: there is no unique
    /// index on `(id1, id2)`.
    #[instrument(skip(self))]
    pub async fn add_link(
        &self,
        id1: i64,
        id2: i64,
        product_id: i64,
    ) -> Result<UpdateResult, CustomError> {
        require_id(id1, "id1")?;
        require_id(id2, "id2")?;
        let pair = LinkPair::canonical(id1, id2);
        let result = self
            .timed(
                self.links
                    .update_one(either_orientation(id1, id2), link_upsert(pair, product_id))
                    .upsert(true),
            )
            .await?;
        debug!(
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "link stored"
        );
        Ok(result)
    }

    /// Merges `fields` into the link with exactly `link`'s stored
    /// `(product_id, id1, id2)`.
    #[instrument(skip_all, fields(id1 = link.id1, id2 = link.id2))]
    pub async fn update_link(
        &self,
        link: &Link,
        fields: Document,
    ) -> Result<UpdateResult, CustomError> {
        require_id(link.id1, "link.id1")?;
        require_id(link.id2, "link.id2")?;
        require_document(&fields, "fields")?;
        self.timed(
            self.links
                .update_one(exact_link(link), doc! { "$set": fields }),
        )
        .await
    }

    /// Looks up the link between two contacts regardless of stored orientation.
    #[instrument(skip(self))]
    pub async fn get_real_link(&self, id1: i64, id2: i64) -> Result<Option<Link>, CustomError> {
        require_id(id1, "id1")?;
        require_id(id2, "id2")?;
        let found = self
            .timed(self.links.find_one(either_orientation(id1, id2)))
            .await?;
        found.map(Link::try_from).transpose()
    }

    /// Any link of `product_id` that has `id` at either endpoint.
    #[instrument(skip(self))]
    pub async fn get_link_data(&self, id: i64, product_id: i64) -> Result<Option<Link>, CustomError> {
        require_id(id, "id")?;
        require_id(product_id, "product_id")?;
        let found = self
            .timed(self.links.find_one(touching(id, product_id)))
            .await?;
        found.map(Link::try_from).transpose()
    }

    /// Unlike [`find_one`](Self::find_one), a miss here is an error:
    /// [`CustomError::ContactNotFound`].
    #[instrument(skip(self))]
    pub async fn get_contact_by_internal_id(
        &self,
        internal_id: i64,
        product_id: i64,
    ) -> Result<Contact, CustomError> {
        let key = ContactKey::new(internal_id, product_id);
        self.timed(self.contacts.find_one(key.filter()))
            .await?
            .ok_or(CustomError::ContactNotFound {
                internal_id,
                product_id,
            })
    }

    /// Deletes every link between `internal_id` and a member of `internal_ids`.
    #[instrument(skip(self))]
    pub async fn delete_many_links(
        &self,
        internal_id: i64,
        internal_ids: &[i64],
    ) -> Result<DeleteResult, CustomError> {
        require_id(internal_id, "internal_id")?;
        if internal_ids.is_empty() {
            warn!(argument = "internal_ids", "rejected empty id list");
            return Err(CustomError::InvalidArgument("internal_ids"));
        }
        let result = self
            .timed(
                self.links
                    .delete_many(between_one_and_many(internal_id, internal_ids)),
            )
            .await?;
        debug!(deleted = result.deleted_count, "links deleted");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_link(&self, id1: i64, id2: i64) -> Result<DeleteResult, CustomError> {
        require_id(id1, "id1")?;
        require_id(id2, "id2")?;
        self.timed(self.links.delete_one(either_orientation(id1, id2)))
            .await
    }

    /// Links pointing at the removed contact are left in place.
    #[instrument(skip_all)]
    pub async fn delete_contact_node(&self, query: Document) -> Result<DeleteResult, CustomError> {
        require_document(&query, "query")?;
        self.timed(self.contacts.delete_one(query)).await
    }

    #[instrument(skip_all)]
    pub async fn delete_contact_nodes(&self, query: Document) -> Result<DeleteResult, CustomError> {
        require_document(&query, "query")?;
        let result = self.timed(self.contacts.delete_many(query)).await?;
        debug!(deleted = result.deleted_count, "contacts deleted");
        Ok(result)
    }

    /// Raw query over the links collection. The query must be non-empty;
    /// options are optional.
    #[instrument(skip_all)]
    pub async fn find_links(
        &self,
        query: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Cursor<Document>, CustomError> {
        require_document(&query, "query")?;
        self.timed(self.links.find(query).with_options(options))
            .await
    }

    /// Atomically allocates the next value of `sequence_name`, starting at 1.
    ///
    /// The counter document is created by the same upserting
    /// find-and-increment, so first use needs no separate bootstrap.
    #[instrument(skip(self))]
    pub async fn get_next_sequence_value(&self, sequence_name: &str) -> Result<i64, CustomError> {
        if sequence_name.is_empty() {
            warn!(argument = "sequence_name", "rejected empty sequence name");
            return Err(CustomError::InvalidArgument("sequence_name"));
        }
        let stored = self
            .timed(
                self.counters
                    .find_one_and_update(
                        doc! { "_id": sequence_name },
                        doc! { "$inc": { "sequence": 1_i64 } },
                    )
                    .upsert(true)
                    .return_document(ReturnDocument::After),
            )
            .await?
            .ok_or_else(|| {
                CustomError::MalformedRecord(format!("counter {} not returned", sequence_name))
            })?;
        let counter = Counter::try_from(stored)?;
        debug!(sequence = counter.sequence, "sequence value allocated");
        Ok(counter.sequence)
    }

    /// Deletes matching links, then matching contacts. No rollback: if the
    /// second step fails the links are already gone.
    #[instrument(skip_all)]
    pub async fn clean_all(&self, query: Document) -> Result<CleanupReport, CustomError> {
        let links = self.timed(self.links.delete_many(query.clone())).await?;
        let contacts = self.timed(self.contacts.delete_many(query)).await?;
        let report = CleanupReport {
            links_deleted: links.deleted_count,
            contacts_deleted: contacts.deleted_count,
        };
        info!(
            links = report.links_deleted,
            contacts = report.contacts_deleted,
            "cleaned contact store"
        );
        Ok(report)
    }
}
