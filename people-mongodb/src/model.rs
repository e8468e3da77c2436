//! The `Person` record and its insert payload.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{MongoError, MongoResult};

/// Name of the identifier field.
pub const ID_FIELD: &str = "_id";

/// Name of the version key field.
pub const VERSION_FIELD: &str = "__v";

/// Field names as stored in the collection.
pub mod fields {
    /// Person name.
    pub const NAME: &str = "name";
    /// Person age.
    pub const AGE: &str = "age";
    /// Favorite foods array.
    pub const FAVORITE_FOODS: &str = "favoriteFoods";
}

/// A stored person.
///
/// Fields absent from a (possibly projected) document decode to their
/// defaults, so a read that excludes `age` still yields a `Person`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Document identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    /// Name. Required on write.
    #[serde(default)]
    pub name: String,
    /// Age in years.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<i32>,
    /// Favorite foods.
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
    /// Version key, bumped on every save.
    #[serde(rename = "__v", default)]
    pub version: i32,
}

impl Person {
    /// Check write-time constraints.
    pub fn validate(&self) -> MongoResult<()> {
        validate_name(&self.name)
    }

    /// Hex form of the id, if assigned.
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    /// Whether `food` is among the favorites.
    pub fn likes(&self, food: &str) -> bool {
        self.favorite_foods.iter().any(|f| f == food)
    }

    /// Render as relaxed extended JSON for console output.
    pub fn to_relaxed_json(&self) -> MongoResult<serde_json::Value> {
        let doc = bson::to_document(self).map_err(|e| MongoError::serialization(e.to_string()))?;
        Ok(bson::Bson::Document(doc).into_relaxed_extjson())
    }
}

/// A person that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    /// Name.
    pub name: String,
    /// Age in years.
    #[serde(default)]
    pub age: Option<i32>,
    /// Favorite foods.
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    /// Start a new person with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the age.
    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// Add a favorite food.
    pub fn favorite_food(mut self, food: impl Into<String>) -> Self {
        self.favorite_foods.push(food.into());
        self
    }

    /// Replace the favorite foods.
    pub fn favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Check write-time constraints.
    pub fn validate(&self) -> MongoResult<()> {
        validate_name(&self.name)
    }

    /// Turn into a storable record with a fresh id at version 0.
    pub fn into_person(self) -> Person {
        Person {
            id: Some(ObjectId::new()),
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
            version: 0,
        }
    }
}

fn validate_name(name: &str) -> MongoResult<()> {
    if name.is_empty() {
        return Err(MongoError::validation("Path `name` is required."));
    }
    Ok(())
}

/// Records used by the demo sequence.
pub mod sample {
    use super::NewPerson;

    /// The single record created by the insert-one step.
    pub fn john_doe() -> NewPerson {
        NewPerson::new("John Doe")
            .age(30)
            .favorite_foods(["Pizza", "Burger"])
    }

    /// The records created by the insert-many step.
    pub fn people() -> Vec<NewPerson> {
        vec![
            NewPerson::new("Alice").age(25).favorite_foods(["Salad", "Pasta"]),
            NewPerson::new("Bob").age(28).favorite_foods(["Tacos", "Pizza"]),
            NewPerson::new("Charlie")
                .age(35)
                .favorite_foods(["Steak", "Fries"]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_person_serializes_field_names() {
        let person = NewPerson::new("Alice").age(25).favorite_food("Salad").into_person();
        let doc = bson::to_document(&person).unwrap();

        assert!(doc.get_object_id("_id").is_ok());
        assert_eq!(doc.get_str("name").unwrap(), "Alice");
        assert_eq!(doc.get_i32("age").unwrap(), 25);
        assert_eq!(doc.get_array("favoriteFoods").unwrap().len(), 1);
        assert_eq!(doc.get_i32("__v").unwrap(), 0);
    }

    #[test]
    fn test_person_decodes_projection_without_age() {
        let oid = ObjectId::new();
        let doc = doc! { "_id": oid, "name": "Bob", "favoriteFoods": ["Burritos"], "__v": 2 };
        let person: Person = bson::from_document(doc).unwrap();

        assert_eq!(person.id, Some(oid));
        assert_eq!(person.age, None);
        assert_eq!(person.version, 2);
        assert!(person.likes("Burritos"));
    }

    #[test]
    fn test_person_decodes_missing_arrays() {
        let person: Person = bson::from_document(doc! { "name": "Eve" }).unwrap();
        assert!(person.favorite_foods.is_empty());
        assert_eq!(person.version, 0);
        assert_eq!(person.id, None);
    }

    #[test]
    fn test_name_is_required() {
        let err = NewPerson::new("").age(3).validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "validation failed: Path `name` is required.");

        assert!(NewPerson::new("Zed").validate().is_ok());
    }

    #[test]
    fn test_into_person_assigns_id() {
        let a = NewPerson::new("A").into_person();
        let b = NewPerson::new("B").into_person();
        assert!(a.id.is_some());
        assert_ne!(a.id, b.id);
        assert_eq!(a.version, 0);
    }

    #[test]
    fn test_relaxed_json() {
        let person = sample::john_doe().into_person();
        let json = person.to_relaxed_json().unwrap();

        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["age"], 30);
        assert_eq!(json["favoriteFoods"][1], "Burger");
        assert_eq!(json["_id"]["$oid"], person.id_hex().unwrap());
    }

    #[test]
    fn test_sample_people() {
        let people = sample::people();
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(people[1].favorite_foods, vec!["Tacos", "Pizza"]);
    }
}
