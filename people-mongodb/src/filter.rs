//! Filter document building.

use bson::{Bson, Document, doc, oid::ObjectId};

use crate::error::MongoResult;
use crate::model::fields;

/// Builder for MongoDB filter documents.
///
/// ```rust,ignore
/// use people_mongodb::FilterBuilder;
///
/// let filter = FilterBuilder::new()
///     .eq("favoriteFoods", "Pizza")
///     .gte("age", 18)
///     .build();
///
/// // Produces: { "favoriteFoods": "Pizza", "age": { "$gte": 18 } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    doc: Document,
}

impl FilterBuilder {
    /// Create a new empty filter builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter builder from an existing document.
    pub fn from_doc(doc: Document) -> Self {
        Self { doc }
    }

    /// Add an equality condition. On an array field this matches membership.
    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, value.into());
        self
    }

    /// Add a not-equal condition.
    pub fn ne(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$ne": value.into() });
        self
    }

    /// Add a greater-than condition.
    pub fn gt(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$gt": value.into() });
        self
    }

    /// Add a greater-than-or-equal condition.
    pub fn gte(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$gte": value.into() });
        self
    }

    /// Add a less-than condition.
    pub fn lt(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$lt": value.into() });
        self
    }

    /// Add a less-than-or-equal condition.
    pub fn lte(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$lte": value.into() });
        self
    }

    /// Add an "in" condition (value in array).
    pub fn in_array(mut self, field: &str, values: Vec<impl Into<Bson>>) -> Self {
        let bson_values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.doc.insert(field, doc! { "$in": bson_values });
        self
    }

    /// Add an exists condition.
    pub fn exists(mut self, field: &str, exists: bool) -> Self {
        self.doc.insert(field, doc! { "$exists": exists });
        self
    }

    /// Add an ObjectId filter on `_id`.
    pub fn by_id(mut self, id: ObjectId) -> Self {
        self.doc.insert("_id", id);
        self
    }

    /// Add an ObjectId filter from its hex form.
    pub fn by_id_str(self, id: &str) -> MongoResult<Self> {
        let oid = ObjectId::parse_str(id)?;
        Ok(self.by_id(oid))
    }

    /// Merge another filter into this one.
    pub fn merge(mut self, other: Document) -> Self {
        for (k, v) in other {
            self.doc.insert(k, v);
        }
        self
    }

    /// Build the filter document.
    pub fn build(self) -> Document {
        self.doc
    }

    /// Check if the filter is empty.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }
}

/// Create an empty filter (matches all documents).
pub fn all() -> Document {
    doc! {}
}

/// Create an `_id` filter.
pub fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

/// Create an `_id` filter from its hex form.
pub fn by_id_str(id: &str) -> MongoResult<Document> {
    let oid = ObjectId::parse_str(id)?;
    Ok(doc! { "_id": oid })
}

/// Match people with the given name.
pub fn by_name(name: &str) -> Document {
    doc! { fields::NAME: name }
}

/// Match people whose favorite foods include `food`.
pub fn has_food(food: &str) -> Document {
    doc! { fields::FAVORITE_FOODS: food }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builder_eq() {
        let filter = FilterBuilder::new()
            .eq("name", "Alice")
            .eq("age", 30)
            .build();

        assert_eq!(filter.get_str("name").unwrap(), "Alice");
        assert_eq!(filter.get_i32("age").unwrap(), 30);
    }

    #[test]
    fn test_filter_builder_comparison() {
        let filter = FilterBuilder::new().gte("age", 18).build();
        let age = filter.get_document("age").unwrap();
        assert_eq!(age.get_i32("$gte").unwrap(), 18);
    }

    #[test]
    fn test_filter_builder_in_array() {
        let filter = FilterBuilder::new()
            .in_array("name", vec!["Alice", "Bob"])
            .build();

        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_array("$in").unwrap().len(), 2);
    }

    #[test]
    fn test_filter_builder_by_id_str() {
        let oid = ObjectId::new();
        let filter = FilterBuilder::new().by_id_str(&oid.to_hex()).unwrap().build();
        assert_eq!(filter.get_object_id("_id").unwrap(), oid);

        let err = FilterBuilder::new().by_id_str("example-id-here").unwrap_err();
        assert!(err.is_invalid_object_id());
    }

    #[test]
    fn test_merge() {
        let filter = FilterBuilder::new()
            .eq("name", "Alice")
            .merge(has_food("Pizza"))
            .build();
        assert_eq!(filter.len(), 2);
        assert!(!FilterBuilder::from_doc(filter).is_empty());
    }

    #[test]
    fn test_helpers() {
        assert!(all().is_empty());
        assert_eq!(by_name("Mary").get_str("name").unwrap(), "Mary");
        assert_eq!(has_food("Burritos").get_str("favoriteFoods").unwrap(), "Burritos");

        let oid = ObjectId::new();
        assert_eq!(by_id(oid).get_object_id("_id").unwrap(), oid);
        assert!(by_id_str("zzz").is_err());
    }
}
