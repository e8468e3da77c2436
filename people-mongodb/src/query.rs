//! Chainable find queries: filter, sort, skip, limit and projection.

use bson::Document;
use mongodb::options::FindOptions;

use crate::error::{MongoError, MongoResult};
use crate::model::ID_FIELD;

/// A find query built up by chaining helpers.
///
/// ```rust,ignore
/// let query = PersonQuery::new(filter::has_food("Burritos"))
///     .sort("name")
///     .limit(2)
///     .select("-age");
/// let people = repo.query(query).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonQuery {
    filter: Document,
    sort: Option<String>,
    skip: Option<u64>,
    limit: Option<i64>,
    select: Option<String>,
}

impl PersonQuery {
    /// Start a query with the given filter.
    pub fn new(filter: Document) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Sort by a spec such as `"name"` or `"name -age"`.
    pub fn sort(mut self, spec: impl Into<String>) -> Self {
        self.sort = Some(spec.into());
        self
    }

    /// Skip the first `n` matches.
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Return at most `n` matches.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Project by a spec such as `"-age"` or `"name favoriteFoods"`.
    pub fn select(mut self, spec: impl Into<String>) -> Self {
        self.select = Some(spec.into());
        self
    }

    /// The filter document.
    pub fn filter(&self) -> &Document {
        &self.filter
    }

    /// Number of matches to skip.
    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    /// Maximum number of matches, after validation.
    pub fn limit_count(&self) -> MongoResult<Option<i64>> {
        match self.limit {
            Some(n) if n < 0 => Err(MongoError::query(format!(
                "limit must not be negative, got {}",
                n
            ))),
            other => Ok(other),
        }
    }

    /// The parsed sort document, if any.
    pub fn sort_doc(&self) -> MongoResult<Option<Document>> {
        self.sort.as_deref().map(parse_sort).transpose().map(Option::flatten)
    }

    /// The parsed projection document, if any.
    pub fn projection_doc(&self) -> MongoResult<Option<Document>> {
        self.select
            .as_deref()
            .map(parse_projection)
            .transpose()
            .map(Option::flatten)
    }

    /// Driver options for this query.
    pub fn find_options(&self) -> MongoResult<FindOptions> {
        let mut options = FindOptions::default();
        options.sort = self.sort_doc()?;
        options.skip = self.skip;
        options.limit = self.limit_count()?;
        options.projection = self.projection_doc()?;
        Ok(options)
    }
}

/// Parse a sort spec into a sort document.
///
/// Fields are whitespace separated; a leading `-` sorts descending.
pub fn parse_sort(spec: &str) -> MongoResult<Option<Document>> {
    let mut sort = Document::new();
    for token in spec.split_whitespace() {
        let (field, direction) = match token.strip_prefix('-') {
            Some(field) => (field, -1),
            None => (token.strip_prefix('+').unwrap_or(token), 1),
        };
        if field.is_empty() {
            return Err(MongoError::query(format!("invalid sort field '{}'", token)));
        }
        sort.insert(field, direction);
    }
    Ok(if sort.is_empty() { None } else { Some(sort) })
}

/// Parse a select spec into a projection document.
///
/// A leading `-` excludes a field, otherwise the field is included. The two
/// styles cannot be mixed, except that `_id` may be excluded from an
/// inclusion projection.
pub fn parse_projection(spec: &str) -> MongoResult<Option<Document>> {
    let mut projection = Document::new();
    let mut includes = false;
    let mut excludes = false;

    for token in spec.split_whitespace() {
        let (field, include) = match token.strip_prefix('-') {
            Some(field) => (field, false),
            None => (token.strip_prefix('+').unwrap_or(token), true),
        };
        if field.is_empty() {
            return Err(MongoError::query(format!(
                "invalid projection field '{}'",
                token
            )));
        }
        if field != ID_FIELD {
            if include {
                includes = true;
            } else {
                excludes = true;
            }
        }
        projection.insert(field, if include { 1 } else { 0 });
    }

    if includes && excludes {
        return Err(MongoError::query(format!(
            "cannot mix inclusion and exclusion in projection '{}'",
            spec
        )));
    }

    Ok(if projection.is_empty() {
        None
    } else {
        Some(projection)
    })
}
