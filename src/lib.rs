//! # People
//!
//! Basic document-database operations on a single MongoDB collection of
//! `Person` records: connect, insert, find, update, delete and chained
//! queries.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use people::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), people::MongoError> {
//!     let client = MongoClient::new(MongoConfig::from_env()?).await?;
//!     client.ping().await?;
//!
//!     let repo = MongoPersonRepository::from_client(&client);
//!     ops::create_many_people(&repo, sample::people()).await?;
//!
//!     let page = ops::query_chain(&repo, "Pizza").await?;
//!     for person in page {
//!         println!("{}", person.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// MongoDB driver layer.
pub mod driver {
    pub use people_mongodb::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use people_mongodb::prelude::*;
}

pub use people_mongodb::{
    DeleteSummary, FilterBuilder, MemoryPersonRepository, MongoClient, MongoConfig, MongoError,
    MongoPersonRepository, MongoResult, NewPerson, OfflinePersonRepository, Person, PersonQuery,
    PersonRepository, filter, ops, sample,
};
