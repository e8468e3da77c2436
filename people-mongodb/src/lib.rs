//! # people-mongodb
//!
//! Document mapping and basic operations for a collection of `Person`
//! records stored in MongoDB.
//!
//! This crate provides:
//! - Connection configuration and a client wrapper over the official driver
//! - The `Person` record with write-time validation and a version key
//! - Filter building and chainable find queries (sort, skip, limit, select)
//! - A `PersonRepository` trait with MongoDB and in-memory implementations,
//!   plus an offline one that reports a failed connection on every call
//! - The example operations (`ops`) built on top of the repository
//!
//! ## Example
//!
//! ```rust,ignore
//! use people_mongodb::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MongoClient::builder()
//!         .uri("mongodb://localhost:27017")
//!         .database("test")
//!         .build()
//!         .await?;
//!
//!     let repo = MongoPersonRepository::from_client(&client);
//!     let john = ops::create_and_save_person(&repo, sample::john_doe()).await?;
//!     let same = ops::find_person_by_id(&repo, &john.id_hex().unwrap()).await?;
//!     assert_eq!(same.map(|p| p.name), Some("John Doe".to_string()));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod model;
pub mod offline;
pub mod ops;
pub mod query;
pub mod repository;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use client::{MongoClient, MongoClientBuilder};
pub use config::{MongoConfig, MongoConfigBuilder};
pub use error::{MongoError, MongoResult};
pub use filter::FilterBuilder;
pub use memory::MemoryPersonRepository;
pub use model::{NewPerson, Person, sample};
pub use offline::OfflinePersonRepository;
pub use query::PersonQuery;
pub use repository::{DeleteSummary, MongoPersonRepository, PersonRepository};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{MongoClient, MongoClientBuilder};
    pub use crate::config::{MongoConfig, MongoConfigBuilder};
    pub use crate::error::{MongoError, MongoResult};
    pub use crate::filter::{self, FilterBuilder};
    pub use crate::memory::MemoryPersonRepository;
    pub use crate::model::{NewPerson, Person, sample};
    pub use crate::offline::OfflinePersonRepository;
    pub use crate::ops;
    pub use crate::query::PersonQuery;
    pub use crate::repository::{DeleteSummary, MongoPersonRepository, PersonRepository};
    pub use bson::oid::ObjectId;
    pub use bson::{Bson, Document, doc};
}
