//! The storage seam for `Person` records and its MongoDB implementation.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use serde::Serialize;
use tracing::debug;

use crate::client::MongoClient;
use crate::error::{MongoError, MongoResult};
use crate::filter;
use crate::model::{ID_FIELD, NewPerson, Person, VERSION_FIELD};
use crate::query::PersonQuery;

/// Outcome of a multi-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    /// Whether the server acknowledged the write.
    ///
    /// Always `true` from [`MongoPersonRepository`]: the driver only returns
    /// a delete result under an acknowledged write concern and reports
    /// anything else as an error.
    pub acknowledged: bool,
    /// Number of documents removed.
    pub deleted_count: u64,
}

/// Operations on a collection of `Person` records.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Validate and store one record, returning it with its id.
    async fn insert_one(&self, person: NewPerson) -> MongoResult<Person>;

    /// Validate every record, then store them all in order.
    async fn insert_many(&self, people: Vec<NewPerson>) -> MongoResult<Vec<Person>>;

    /// All records matching `filter`.
    async fn find(&self, filter: Document) -> MongoResult<Vec<Person>>;

    /// The first record matching `filter`.
    async fn find_one(&self, filter: Document) -> MongoResult<Option<Person>>;

    /// Look up a record by the hex form of its id.
    ///
    /// An id that is not a valid ObjectId is an error, not a miss.
    async fn find_by_id(&self, id: &str) -> MongoResult<Option<Person>> {
        let filter = filter::by_id_str(id)?;
        self.find_one(filter).await
    }

    /// Write back a record that was read earlier.
    ///
    /// The write only applies if the stored version still matches
    /// `person.version`; the returned record carries the bumped version.
    async fn save(&self, person: &Person) -> MongoResult<Person>;

    /// Atomically update the first record matching `filter` and return its
    /// new state. A plain field document is treated as a `$set`.
    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> MongoResult<Option<Person>>;

    /// Remove a record by id, returning what was removed.
    async fn find_by_id_and_delete(&self, id: &str) -> MongoResult<Option<Person>>;

    /// Remove every record matching `filter`.
    async fn delete_many(&self, filter: Document) -> MongoResult<DeleteSummary>;

    /// Run a chained query.
    async fn query(&self, query: PersonQuery) -> MongoResult<Vec<Person>>;
}

/// Wrap a plain field document in `$set`; pass operator documents through.
pub fn normalize_update(update: Document) -> MongoResult<Document> {
    if update.is_empty() {
        return Err(MongoError::query("update document is empty"));
    }

    let operators = update.keys().filter(|k| k.starts_with('$')).count();
    if operators == update.len() {
        Ok(update)
    } else if operators == 0 {
        if update.contains_key(ID_FIELD) {
            return Err(MongoError::query("cannot update the _id field"));
        }
        Ok(doc! { "$set": update })
    } else {
        Err(MongoError::query(
            "update document mixes operators and plain fields",
        ))
    }
}

/// Filter that matches a record only at the version it was read at.
pub(crate) fn save_filter(person: &Person) -> MongoResult<Document> {
    let id = person
        .id
        .ok_or_else(|| MongoError::query("cannot save a person without an id"))?;
    Ok(doc! { ID_FIELD: id, VERSION_FIELD: person.version })
}

pub(crate) fn version_conflict(person: &Person) -> MongoError {
    MongoError::VersionConflict {
        id: person.id_hex().unwrap_or_default(),
        version: person.version,
    }
}

/// `Person` repository backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoPersonRepository {
    collection: Collection<Person>,
}

impl MongoPersonRepository {
    /// Wrap an existing collection.
    pub fn new(collection: Collection<Person>) -> Self {
        Self { collection }
    }

    /// Use the collection configured on `client`.
    pub fn from_client(client: &MongoClient) -> Self {
        Self::new(client.people())
    }

    /// The underlying collection.
    pub fn collection(&self) -> &Collection<Person> {
        &self.collection
    }
}

#[async_trait]
impl PersonRepository for MongoPersonRepository {
    async fn insert_one(&self, person: NewPerson) -> MongoResult<Person> {
        person.validate()?;
        let person = person.into_person();

        debug!(collection = %self.collection.name(), name = %person.name, "Executing insert_one");
        self.collection.insert_one(&person, None).await?;
        Ok(person)
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> MongoResult<Vec<Person>> {
        for person in &people {
            person.validate()?;
        }
        if people.is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<Person> = people.into_iter().map(NewPerson::into_person).collect();

        debug!(collection = %self.collection.name(), count = records.len(), "Executing insert_many");
        self.collection.insert_many(&records, None).await?;
        Ok(records)
    }

    async fn find(&self, filter: Document) -> MongoResult<Vec<Person>> {
        debug!(collection = %self.collection.name(), filter = %filter, "Executing find");
        let cursor = self.collection.find(filter, None).await?;
        let people: Vec<Person> = cursor.try_collect().await?;
        Ok(people)
    }

    async fn find_one(&self, filter: Document) -> MongoResult<Option<Person>> {
        debug!(collection = %self.collection.name(), filter = %filter, "Executing find_one");
        let person = self.collection.find_one(filter, None).await?;
        Ok(person)
    }

    async fn save(&self, person: &Person) -> MongoResult<Person> {
        person.validate()?;
        let filter = save_filter(person)?;
        let mut next = person.clone();
        next.version += 1;

        debug!(collection = %self.collection.name(), filter = %filter, "Executing save");
        let result = self.collection.replace_one(filter, &next, None).await?;
        if result.matched_count == 0 {
            return Err(version_conflict(person));
        }
        Ok(next)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> MongoResult<Option<Person>> {
        let update = normalize_update(update)?;
        let mut options = FindOneAndUpdateOptions::default();
        options.return_document = Some(ReturnDocument::After);

        debug!(
            collection = %self.collection.name(),
            filter = %filter,
            update = %update,
            "Executing find_one_and_update"
        );
        let person = self
            .collection
            .find_one_and_update(filter, update, options)
            .await?;
        Ok(person)
    }

    async fn find_by_id_and_delete(&self, id: &str) -> MongoResult<Option<Person>> {
        let filter = filter::by_id_str(id)?;

        debug!(collection = %self.collection.name(), filter = %filter, "Executing find_one_and_delete");
        let person = self.collection.find_one_and_delete(filter, None).await?;
        Ok(person)
    }

    async fn delete_many(&self, filter: Document) -> MongoResult<DeleteSummary> {
        debug!(collection = %self.collection.name(), filter = %filter, "Executing delete_many");
        let result = self.collection.delete_many(filter, None).await?;
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn query(&self, query: PersonQuery) -> MongoResult<Vec<Person>> {
        let options = query.find_options()?;

        debug!(
            collection = %self.collection.name(),
            filter = %query.filter(),
            sort = ?options.sort,
            limit = ?options.limit,
            projection = ?options.projection,
            "Executing query"
        );
        let cursor = self
            .collection
            .find(query.filter().clone(), options)
            .await?;
        let people: Vec<Person> = cursor.try_collect().await?;
        Ok(people)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_update_wraps_plain_fields() {
        let update = normalize_update(doc! { "age": 20 }).unwrap();
        assert_eq!(update, doc! { "$set": { "age": 20 } });
    }

    #[test]
    fn test_normalize_update_passes_operators() {
        let update = doc! { "$push": { "favoriteFoods": "Hamburger" } };
        assert_eq!(normalize_update(update.clone()).unwrap(), update);
    }

    #[test]
    fn test_normalize_update_rejects_bad_documents() {
        assert!(normalize_update(doc! {}).is_err());
        assert!(normalize_update(doc! { "$set": { "age": 1 }, "name": "x" }).is_err());
        assert!(normalize_update(doc! { "_id": ObjectId::new() }).is_err());
    }

    #[test]
    fn test_save_filter() {
        let mut person = NewPerson::new("Alice").into_person();
        person.version = 4;
        let filter = save_filter(&person).unwrap();
        assert_eq!(filter.get_object_id("_id").unwrap(), person.id.unwrap());
        assert_eq!(filter.get_i32("__v").unwrap(), 4);

        person.id = None;
        assert!(save_filter(&person).is_err());
    }

    #[test]
    fn test_delete_summary_serializes_camel_case() {
        let summary = DeleteSummary {
            acknowledged: true,
            deleted_count: 3,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["deletedCount"], 3);
        assert_eq!(json["acknowledged"], true);
    }
}
