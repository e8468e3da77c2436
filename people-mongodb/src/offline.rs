//! A repository for when no client could be created.

use async_trait::async_trait;
use bson::Document;

use crate::error::{MongoError, MongoResult};
use crate::model::{NewPerson, Person};
use crate::query::PersonQuery;
use crate::repository::{DeleteSummary, PersonRepository};

/// `Person` repository that fails every call with the same connection error.
///
/// Lets a caller keep running a sequence of operations after the client
/// could not be built, with each operation reporting why.
#[derive(Debug, Clone)]
pub struct OfflinePersonRepository {
    reason: String,
}

impl OfflinePersonRepository {
    /// Fail every call with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the repository is offline.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn unavailable<T>(&self) -> MongoResult<T> {
        Err(MongoError::connection(self.reason.clone()))
    }
}

#[async_trait]
impl PersonRepository for OfflinePersonRepository {
    async fn insert_one(&self, _person: NewPerson) -> MongoResult<Person> {
        self.unavailable()
    }

    async fn insert_many(&self, _people: Vec<NewPerson>) -> MongoResult<Vec<Person>> {
        self.unavailable()
    }

    async fn find(&self, _filter: Document) -> MongoResult<Vec<Person>> {
        self.unavailable()
    }

    async fn find_one(&self, _filter: Document) -> MongoResult<Option<Person>> {
        self.unavailable()
    }

    async fn find_by_id(&self, _id: &str) -> MongoResult<Option<Person>> {
        self.unavailable()
    }

    async fn save(&self, _person: &Person) -> MongoResult<Person> {
        self.unavailable()
    }

    async fn find_one_and_update(
        &self,
        _filter: Document,
        _update: Document,
    ) -> MongoResult<Option<Person>> {
        self.unavailable()
    }

    async fn find_by_id_and_delete(&self, _id: &str) -> MongoResult<Option<Person>> {
        self.unavailable()
    }

    async fn delete_many(&self, _filter: Document) -> MongoResult<DeleteSummary> {
        self.unavailable()
    }

    async fn query(&self, _query: PersonQuery) -> MongoResult<Vec<Person>> {
        self.unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use crate::model::sample;
    use crate::ops;

    #[tokio::test]
    async fn test_every_call_is_a_connection_error() {
        let repo = OfflinePersonRepository::new("failed to parse URI");

        let err = ops::create_and_save_person(&repo, sample::john_doe())
            .await
            .unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(err.to_string(), "connection error: failed to parse URI");

        assert!(ops::find_person_by_id(&repo, "example-id-here")
            .await
            .unwrap_err()
            .is_connection_error());
        assert!(repo
            .delete_many(filter::by_name("Mary"))
            .await
            .unwrap_err()
            .is_connection_error());
        assert!(ops::query_chain(&repo, "Burritos")
            .await
            .unwrap_err()
            .is_connection_error());
    }
}
