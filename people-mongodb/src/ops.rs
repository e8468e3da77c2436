//! The example operations, one per basic ODM capability.
//!
//! Each function is a thin wrapper over a single [`PersonRepository`] call
//! (two for [`find_edit_then_save`]) and works against any backend.

use bson::doc;
use tracing::debug;

use crate::error::{MongoError, MongoResult};
use crate::filter;
use crate::model::{NewPerson, Person, fields};
use crate::query::PersonQuery;
use crate::repository::{DeleteSummary, PersonRepository};

/// Sort spec used by [`query_chain`].
pub const QUERY_CHAIN_SORT: &str = "name";

/// Page size used by [`query_chain`].
pub const QUERY_CHAIN_LIMIT: i64 = 2;

/// Projection used by [`query_chain`].
pub const QUERY_CHAIN_SELECT: &str = "-age";

/// Create and save a single record.
pub async fn create_and_save_person<R>(repo: &R, person: NewPerson) -> MongoResult<Person>
where
    R: PersonRepository + ?Sized,
{
    repo.insert_one(person).await
}

/// Create several records at once.
pub async fn create_many_people<R>(repo: &R, people: Vec<NewPerson>) -> MongoResult<Vec<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.insert_many(people).await
}

/// All people with the given name.
pub async fn find_people_by_name<R>(repo: &R, name: &str) -> MongoResult<Vec<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.find(filter::by_name(name)).await
}

/// One person whose favorite foods include `food`.
pub async fn find_one_by_food<R>(repo: &R, food: &str) -> MongoResult<Option<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.find_one(filter::has_food(food)).await
}

/// The person with the given id.
pub async fn find_person_by_id<R>(repo: &R, id: &str) -> MongoResult<Option<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.find_by_id(id).await
}

/// Classic update: read by id, append a favorite food, then save.
pub async fn find_edit_then_save<R>(repo: &R, id: &str, food: &str) -> MongoResult<Person>
where
    R: PersonRepository + ?Sized,
{
    let mut person = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| MongoError::not_found(format!("person with id {}", id)))?;

    debug!(id = %id, food = %food, version = person.version, "Appending favorite food");
    person.favorite_foods.push(food.to_string());
    repo.save(&person).await
}

/// Atomically set the age of the first person named `name`.
pub async fn find_and_update<R>(repo: &R, name: &str, age: i32) -> MongoResult<Option<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.find_one_and_update(filter::by_name(name), doc! { fields::AGE: age })
        .await
}

/// Delete one person by id, returning the removed record.
pub async fn delete_by_id<R>(repo: &R, id: &str) -> MongoResult<Option<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.find_by_id_and_delete(id).await
}

/// Delete every person with the given name.
pub async fn delete_many_people<R>(repo: &R, name: &str) -> MongoResult<DeleteSummary>
where
    R: PersonRepository + ?Sized,
{
    repo.delete_many(filter::by_name(name)).await
}

/// The chained query run by the demo: people who like `food`, sorted by
/// name, at most two, without their age.
pub fn query_chain_query(food: &str) -> PersonQuery {
    PersonQuery::new(filter::has_food(food))
        .sort(QUERY_CHAIN_SORT)
        .limit(QUERY_CHAIN_LIMIT)
        .select(QUERY_CHAIN_SELECT)
}

/// Run [`query_chain_query`].
pub async fn query_chain<R>(repo: &R, food: &str) -> MongoResult<Vec<Person>>
where
    R: PersonRepository + ?Sized,
{
    repo.query(query_chain_query(food)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPersonRepository;
    use crate::model::sample;
    use pretty_assertions::assert_eq;

    async fn seeded() -> MemoryPersonRepository {
        let repo = MemoryPersonRepository::new();
        create_and_save_person(&repo, sample::john_doe()).await.unwrap();
        create_many_people(&repo, sample::people()).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = seeded().await;

        let alices = find_people_by_name(&repo, "Alice").await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].favorite_foods, vec!["Salad", "Pasta"]);

        let pizza = find_one_by_food(&repo, "Pizza").await.unwrap().unwrap();
        assert_eq!(pizza.name, "John Doe");
    }

    #[tokio::test]
    async fn test_find_person_by_id_rejects_bad_ids() {
        let repo = seeded().await;
        let err = find_person_by_id(&repo, "example-id-here").await.unwrap_err();
        assert!(err.is_invalid_object_id());
    }

    #[tokio::test]
    async fn test_find_edit_then_save() {
        let repo = seeded().await;
        let bob = find_one_by_food(&repo, "Tacos").await.unwrap().unwrap();
        let id = bob.id_hex().unwrap();

        let updated = find_edit_then_save(&repo, &id, "Hamburger").await.unwrap();
        assert_eq!(updated.favorite_foods, vec!["Tacos", "Pizza", "Hamburger"]);
        assert_eq!(updated.version, 1);

        let stored = find_person_by_id(&repo, &id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_find_edit_then_save_missing_person() {
        let repo = seeded().await;
        let id = bson::oid::ObjectId::new().to_hex();
        let err = find_edit_then_save(&repo, &id, "Hamburger").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_and_update() {
        let repo = seeded().await;
        let alice = find_and_update(&repo, "Alice", 20).await.unwrap().unwrap();
        assert_eq!(alice.age, Some(20));
        assert_eq!(alice.name, "Alice");

        assert!(find_and_update(&repo, "Nobody", 20).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_operations() {
        let repo = seeded().await;
        let charlie = find_one_by_food(&repo, "Steak").await.unwrap().unwrap();

        let removed = delete_by_id(&repo, &charlie.id_hex().unwrap()).await.unwrap();
        assert_eq!(removed.map(|p| p.name), Some("Charlie".to_string()));

        let summary = delete_many_people(&repo, "Mary").await.unwrap();
        assert_eq!(summary.deleted_count, 0);
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn test_query_chain() {
        let repo = seeded().await;
        assert!(query_chain(&repo, "Burritos").await.unwrap().is_empty());

        let people = query_chain(&repo, "Pizza").await.unwrap();
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "John Doe"]);
        assert!(people.iter().all(|p| p.age.is_none()));
    }

    #[test]
    fn test_query_chain_query() {
        let options = query_chain_query("Burritos").find_options().unwrap();
        assert_eq!(options.limit, Some(2));
        assert_eq!(options.sort, Some(doc! { "name": 1 }));
        assert_eq!(options.projection, Some(doc! { "age": 0 }));
    }
}
