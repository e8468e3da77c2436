//! The fixed sequence of example operations.
//!
//! Every step runs regardless of how earlier steps fared; a failure is
//! logged, printed and recorded in the [`DemoReport`].

use std::fmt;

use people_mongodb::ops;
use people_mongodb::sample;
use people_mongodb::{MongoResult, NewPerson, Person, PersonRepository};
use serde_json::Value;
use tracing::{error, info};

use crate::output;

/// Name looked up by the find step.
pub const DEFAULT_FIND_NAME: &str = "Alice";
/// Food looked up by the find-one step.
pub const DEFAULT_FIND_FOOD: &str = "Pizza";
/// Placeholder id; it is not a valid ObjectId, so the id steps fail the cast.
pub const DEFAULT_TARGET_ID: &str = "example-id-here";
/// Food appended by the edit step.
pub const DEFAULT_ADDED_FOOD: &str = "Hamburger";
/// Name targeted by the update step.
pub const DEFAULT_UPDATE_NAME: &str = "Alice";
/// Age set by the update step.
pub const DEFAULT_UPDATE_AGE: i32 = 20;
/// Name removed by the delete-many step.
pub const DEFAULT_DELETE_NAME: &str = "Mary";
/// Food used by the chained query step.
pub const DEFAULT_QUERY_FOOD: &str = "Burritos";

/// Number of steps in the sequence.
pub const STEP_COUNT: usize = 10;

/// Arguments for every step of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPlan {
    /// Record created by the insert-one step.
    pub person: NewPerson,
    /// Records created by the insert-many step.
    pub people: Vec<NewPerson>,
    /// Name looked up by the find step.
    pub find_name: String,
    /// Food looked up by the find-one step.
    pub find_food: String,
    /// Id used by the find-by-id, edit and delete steps.
    pub target_id: String,
    /// Use the id assigned in the insert-one step instead of `target_id`.
    pub use_inserted_id: bool,
    /// Food appended by the edit step.
    pub added_food: String,
    /// Name targeted by the update step.
    pub update_name: String,
    /// Age set by the update step.
    pub update_age: i32,
    /// Name removed by the delete-many step.
    pub delete_name: String,
    /// Food used by the chained query step.
    pub query_food: String,
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            person: sample::john_doe(),
            people: sample::people(),
            find_name: DEFAULT_FIND_NAME.to_string(),
            find_food: DEFAULT_FIND_FOOD.to_string(),
            target_id: DEFAULT_TARGET_ID.to_string(),
            use_inserted_id: false,
            added_food: DEFAULT_ADDED_FOOD.to_string(),
            update_name: DEFAULT_UPDATE_NAME.to_string(),
            update_age: DEFAULT_UPDATE_AGE,
            delete_name: DEFAULT_DELETE_NAME.to_string(),
            query_food: DEFAULT_QUERY_FOOD.to_string(),
        }
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The operation succeeded; carries a one-line summary.
    Ok(String),
    /// The operation failed; carries the error message.
    Failed(String),
}

impl StepStatus {
    /// Whether the step succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step name.
    pub name: &'static str,
    /// Result of the step.
    pub status: StepStatus,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoReport {
    /// Steps in execution order.
    pub steps: Vec<StepOutcome>,
}

impl DemoReport {
    /// Number of steps that failed.
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.status.is_ok()).count()
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps, {} succeeded, {} failed",
            self.steps.len(),
            self.steps.len() - self.failures(),
            self.failures()
        )
    }
}

struct Runner {
    report: DemoReport,
}

impl Runner {
    /// Record a step, printing its label, result and the rendered payload.
    fn record<T>(
        &mut self,
        name: &'static str,
        label: &str,
        result: MongoResult<T>,
        render: impl FnOnce(&T) -> (String, Value),
    ) -> Option<T> {
        let number = self.report.steps.len() + 1;
        output::step(number, STEP_COUNT, name);

        let (status, value) = match result {
            Ok(value) => {
                let (summary, json) = render(&value);
                info!(step = name, summary = %summary, "Demo step succeeded");
                output::success(&format!("{}: {}", label, summary));
                output::json(&json);
                (StepStatus::Ok(summary), Some(value))
            }
            Err(e) => {
                error!(step = name, error = %e, "Demo step failed");
                output::error(&format!("{}: {}", name, e));
                (StepStatus::Failed(e.to_string()), None)
            }
        };

        self.report.steps.push(StepOutcome { name, status });
        value
    }
}

fn person_json(person: &Person) -> Value {
    person.to_relaxed_json().unwrap_or(Value::Null)
}

fn people_json(people: &[Person]) -> Value {
    Value::Array(people.iter().map(person_json).collect())
}

fn optional_json(person: &Option<Person>) -> Value {
    person.as_ref().map(person_json).unwrap_or(Value::Null)
}

fn optional_summary(person: &Option<Person>) -> String {
    match person {
        Some(p) => p.name.clone(),
        None => "none".to_string(),
    }
}

fn names(people: &[Person]) -> String {
    if people.is_empty() {
        return "none".to_string();
    }
    people
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run every step against `repo` in the fixed order.
pub async fn run_demo<R>(repo: &R, plan: &DemoPlan) -> DemoReport
where
    R: PersonRepository + ?Sized,
{
    let mut runner = Runner {
        report: DemoReport::default(),
    };

    let saved = runner.record(
        "create_and_save_person",
        "Person saved",
        ops::create_and_save_person(repo, plan.person.clone()).await,
        |p| (p.name.clone(), person_json(p)),
    );

    runner.record(
        "create_many_people",
        "People added",
        ops::create_many_people(repo, plan.people.clone()).await,
        |people| (names(people), people_json(people)),
    );

    runner.record(
        "find_people_by_name",
        "People found",
        ops::find_people_by_name(repo, &plan.find_name).await,
        |people| (names(people), people_json(people)),
    );

    runner.record(
        "find_one_by_food",
        "Person found",
        ops::find_one_by_food(repo, &plan.find_food).await,
        |p| (optional_summary(p), optional_json(p)),
    );

    let target_id = match saved.as_ref().and_then(Person::id_hex) {
        Some(id) if plan.use_inserted_id => id,
        _ => plan.target_id.clone(),
    };

    runner.record(
        "find_person_by_id",
        "Person found by ID",
        ops::find_person_by_id(repo, &target_id).await,
        |p| (optional_summary(p), optional_json(p)),
    );

    runner.record(
        "find_edit_then_save",
        "Updated person",
        ops::find_edit_then_save(repo, &target_id, &plan.added_food).await,
        |p| (p.name.clone(), person_json(p)),
    );

    runner.record(
        "find_and_update",
        "Updated person",
        ops::find_and_update(repo, &plan.update_name, plan.update_age).await,
        |p| (optional_summary(p), optional_json(p)),
    );

    runner.record(
        "delete_by_id",
        "Person deleted",
        ops::delete_by_id(repo, &target_id).await,
        |p| (optional_summary(p), optional_json(p)),
    );

    runner.record(
        "delete_many_people",
        "People deleted",
        ops::delete_many_people(repo, &plan.delete_name).await,
        |summary| {
            (
                format!("{} deleted", summary.deleted_count),
                serde_json::to_value(summary).unwrap_or(Value::Null),
            )
        },
    );

    runner.record(
        "query_chain",
        "Query result",
        ops::query_chain(repo, &plan.query_food).await,
        |people| (names(people), people_json(people)),
    );

    runner.report
}
