//! In-process `Person` repository.
//!
//! Holds documents in insertion order and evaluates the subset of the query
//! language that [`FilterBuilder`](crate::filter::FilterBuilder) and
//! [`PersonQuery`] produce. Used for dry runs and tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use bson::{Bson, Document};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{MongoError, MongoResult};
use crate::filter;
use crate::model::{ID_FIELD, NewPerson, Person};
use crate::query::PersonQuery;
use crate::repository::{
    DeleteSummary, PersonRepository, normalize_update, save_filter, version_conflict,
};

/// `Person` repository kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPersonRepository {
    docs: RwLock<Vec<Document>>,
}

impl MemoryPersonRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    fn position(docs: &[Document], filter: &Document) -> MongoResult<Option<usize>> {
        for (i, doc) in docs.iter().enumerate() {
            if matches(doc, filter)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl PersonRepository for MemoryPersonRepository {
    async fn insert_one(&self, person: NewPerson) -> MongoResult<Person> {
        person.validate()?;
        let person = person.into_person();
        let doc = bson::to_document(&person)?;

        debug!(name = %person.name, "Executing in-memory insert_one");
        self.docs.write().push(doc);
        Ok(person)
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> MongoResult<Vec<Person>> {
        for person in &people {
            person.validate()?;
        }
        let records: Vec<Person> = people.into_iter().map(NewPerson::into_person).collect();
        let docs = records
            .iter()
            .map(bson::to_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Executing in-memory insert_many");
        self.docs.write().extend(docs);
        Ok(records)
    }

    async fn find(&self, filter: Document) -> MongoResult<Vec<Person>> {
        debug!(filter = %filter, "Executing in-memory find");
        let docs = self.docs.read();
        let mut people = Vec::new();
        for doc in docs.iter() {
            if matches(doc, &filter)? {
                people.push(bson::from_document(doc.clone())?);
            }
        }
        Ok(people)
    }

    async fn find_one(&self, filter: Document) -> MongoResult<Option<Person>> {
        debug!(filter = %filter, "Executing in-memory find_one");
        let docs = self.docs.read();
        match Self::position(&docs, &filter)? {
            Some(i) => Ok(Some(bson::from_document(docs[i].clone())?)),
            None => Ok(None),
        }
    }

    async fn save(&self, person: &Person) -> MongoResult<Person> {
        person.validate()?;
        let filter = save_filter(person)?;
        let mut next = person.clone();
        next.version += 1;
        let replacement = bson::to_document(&next)?;

        debug!(filter = %filter, "Executing in-memory save");
        let mut docs = self.docs.write();
        match Self::position(&docs, &filter)? {
            Some(i) => {
                docs[i] = replacement;
                Ok(next)
            }
            None => Err(version_conflict(person)),
        }
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> MongoResult<Option<Person>> {
        let update = normalize_update(update)?;

        debug!(filter = %filter, update = %update, "Executing in-memory find_one_and_update");
        let mut docs = self.docs.write();
        let Some(i) = Self::position(&docs, &filter)? else {
            return Ok(None);
        };
        let mut updated = docs[i].clone();
        apply_update(&mut updated, &update)?;
        // The write lands even if the new state does not decode, as on a server.
        docs[i] = updated.clone();
        Ok(Some(bson::from_document(updated)?))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> MongoResult<Option<Person>> {
        let filter = filter::by_id_str(id)?;

        debug!(filter = %filter, "Executing in-memory find_one_and_delete");
        let mut docs = self.docs.write();
        match Self::position(&docs, &filter)? {
            Some(i) => Ok(Some(bson::from_document(docs.remove(i))?)),
            None => Ok(None),
        }
    }

    async fn delete_many(&self, filter: Document) -> MongoResult<DeleteSummary> {
        debug!(filter = %filter, "Executing in-memory delete_many");
        let mut docs = self.docs.write();
        let mut kept = Vec::with_capacity(docs.len());
        let mut deleted_count = 0;
        for doc in docs.drain(..) {
            if matches(&doc, &filter)? {
                deleted_count += 1;
            } else {
                kept.push(doc);
            }
        }
        *docs = kept;
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn query(&self, query: PersonQuery) -> MongoResult<Vec<Person>> {
        let sort = query.sort_doc()?;
        let limit = query.limit_count()?;
        let projection = query.projection_doc()?;

        debug!(filter = %query.filter(), "Executing in-memory query");
        let mut selected = Vec::new();
        for doc in self.docs.read().iter() {
            if matches(doc, query.filter())? {
                selected.push(doc.clone());
            }
        }

        if let Some(sort) = sort {
            selected.sort_by(|a, b| compare_by(a, b, &sort));
        }

        let skip = query.skip_count().unwrap_or(0) as usize;
        let take = match limit {
            Some(n) if n > 0 => n as usize,
            _ => usize::MAX,
        };

        selected
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|doc| {
                let doc = match &projection {
                    Some(projection) => project(doc, projection),
                    None => doc,
                };
                bson::from_document(doc).map_err(MongoError::from)
            })
            .collect()
    }
}

fn matches(doc: &Document, filter: &Document) -> MongoResult<bool> {
    for (field, condition) in filter {
        if field.starts_with('$') {
            return Err(MongoError::query(format!(
                "unsupported top-level operator '{}'",
                field
            )));
        }
        let value = doc.get(field);
        let satisfied = match condition {
            Bson::Document(ops) if is_operator_doc(ops) => {
                let mut all = true;
                for (op, operand) in ops {
                    if !eval_operator(value, op, operand)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            _ => equals(value, condition),
        };
        if !satisfied {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_doc(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn eval_operator(value: Option<&Bson>, op: &str, operand: &Bson) -> MongoResult<bool> {
    let result = match op {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$gt" => any_element(value, |v| compare(v, operand) == Some(Ordering::Greater)),
        "$gte" => any_element(value, |v| {
            matches!(compare(v, operand), Some(Ordering::Greater | Ordering::Equal))
        }),
        "$lt" => any_element(value, |v| compare(v, operand) == Some(Ordering::Less)),
        "$lte" => any_element(value, |v| {
            matches!(compare(v, operand), Some(Ordering::Less | Ordering::Equal))
        }),
        "$in" | "$nin" => {
            let Bson::Array(candidates) = operand else {
                return Err(MongoError::query(format!("{} needs an array", op)));
            };
            let found = candidates.iter().any(|c| equals(value, c));
            if op == "$in" { found } else { !found }
        }
        "$exists" => {
            let wanted = operand.as_bool().unwrap_or(true);
            value.is_some() == wanted
        }
        other => {
            return Err(MongoError::query(format!(
                "unsupported filter operator '{}'",
                other
            )));
        }
    };
    Ok(result)
}

/// Equality with array membership and missing-as-null semantics.
fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| scalar_eq(item, expected))
        }
        Some(v) => scalar_eq(v, expected),
    }
}

fn any_element(value: Option<&Bson>, pred: impl Fn(&Bson) -> bool) -> bool {
    match value {
        None => false,
        Some(Bson::Array(items)) => items.iter().any(pred),
        Some(v) => pred(v),
    }
}

fn scalar_eq(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

/// Compare two values of the same kind; mismatched kinds are incomparable.
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Rank used to order values of different kinds, missing values first.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 5,
        Some(Bson::Boolean(_)) => 6,
        Some(Bson::DateTime(_)) => 7,
        Some(_) => 8,
    }
}

fn compare_by(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (field, direction) in sort {
        let (x, y) = (a.get(field), b.get(field));
        let ordering = match (x, y) {
            (Some(x), Some(y)) => compare(x, y)
                .unwrap_or_else(|| type_rank(Some(x)).cmp(&type_rank(Some(y)))),
            _ => type_rank(x).cmp(&type_rank(y)),
        };
        let ordering = if as_f64(direction).is_some_and(|d| d < 0.0) {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn project(doc: Document, projection: &Document) -> Document {
    let inclusive = projection
        .iter()
        .any(|(field, flag)| field != ID_FIELD && is_truthy(flag));

    if inclusive {
        let keep_id = projection.get(ID_FIELD).is_none_or(is_truthy);
        doc.into_iter()
            .filter(|(field, _)| {
                if field == ID_FIELD {
                    keep_id
                } else {
                    projection.get(field).is_some_and(is_truthy)
                }
            })
            .collect()
    } else {
        doc.into_iter()
            .filter(|(field, _)| !projection.contains_key(field))
            .collect()
    }
}

fn is_truthy(flag: &Bson) -> bool {
    match flag {
        Bson::Boolean(b) => *b,
        other => as_f64(other).is_some_and(|n| n != 0.0),
    }
}

fn apply_update(doc: &mut Document, update: &Document) -> MongoResult<()> {
    for (op, fields) in update {
        let Bson::Document(fields) = fields else {
            return Err(MongoError::query(format!("{} needs a document", op)));
        };
        for (field, value) in fields {
            if field == ID_FIELD {
                return Err(MongoError::query("cannot update the _id field"));
            }
            match op.as_str() {
                "$set" => {
                    doc.insert(field.clone(), value.clone());
                }
                "$unset" => {
                    doc.remove(field);
                }
                "$push" => match doc.get_mut(field) {
                    Some(Bson::Array(items)) => items.push(value.clone()),
                    Some(_) => {
                        return Err(MongoError::query(format!(
                            "cannot $push to non-array field '{}'",
                            field
                        )));
                    }
                    None => {
                        doc.insert(field.clone(), Bson::Array(vec![value.clone()]));
                    }
                },
                "$inc" => {
                    let current = doc.get(field).cloned().unwrap_or(Bson::Int32(0));
                    let sum = match (&current, value) {
                        (Bson::Int32(a), Bson::Int32(b)) => a
                            .checked_add(*b)
                            .map(Bson::Int32)
                            .unwrap_or(Bson::Int64(i64::from(*a) + i64::from(*b))),
                        (Bson::Int32(_) | Bson::Int64(_), Bson::Int32(_) | Bson::Int64(_)) => {
                            let a = as_i64(&current).unwrap_or_default();
                            let b = as_i64(value).unwrap_or_default();
                            match a.checked_add(b) {
                                Some(n) => Bson::Int64(n),
                                None => {
                                    return Err(MongoError::query(format!(
                                        "$inc overflows field '{}'",
                                        field
                                    )));
                                }
                            }
                        }
                        _ => match (as_f64(&current), as_f64(value)) {
                            (Some(a), Some(b)) => Bson::Double(a + b),
                            _ => {
                                return Err(MongoError::query(format!(
                                    "cannot $inc non-numeric field '{}'",
                                    field
                                )));
                            }
                        },
                    };
                    doc.insert(field.clone(), sum);
                }
                other => {
                    return Err(MongoError::query(format!(
                        "unsupported update operator '{}'",
                        other
                    )));
                }
            }
        }
    }
    Ok(())
}
