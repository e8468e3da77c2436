//! Single-operation commands on the Person collection.

use people_mongodb::{NewPerson, PersonQuery, filter, ops, sample};

use crate::cli::{
    AddFoodArgs, CreateArgs, CreateManyArgs, FoodArgs, GlobalArgs, IdArgs, NameArgs, QueryArgs,
    SetAgeArgs,
};
use crate::commands::{Session, print_people, print_person};
use crate::error::{CliError, CliResult};
use crate::output;

async fn connect(global: &GlobalArgs) -> CliResult<Session> {
    let session = Session::open(global).await?;
    session.check_connection().await?;
    Ok(session)
}

/// Run the create command
pub async fn create(global: &GlobalArgs, args: CreateArgs) -> CliResult<()> {
    let mut person = NewPerson::new(args.name).favorite_foods(args.foods);
    person.age = args.age;

    let session = connect(global).await?;
    let saved = ops::create_and_save_person(session.repo.as_ref(), person).await?;
    print_person("Person saved", Some(&saved))
}

/// Run the create-many command
pub async fn create_many(global: &GlobalArgs, args: CreateManyArgs) -> CliResult<()> {
    let people = match args.file {
        Some(path) => read_people(&tokio::fs::read_to_string(&path).await?)?,
        None => sample::people(),
    };

    let session = connect(global).await?;
    let saved = ops::create_many_people(session.repo.as_ref(), people).await?;
    print_people("People added", &saved)
}

/// Parse a JSON array of people.
pub fn read_people(json: &str) -> CliResult<Vec<NewPerson>> {
    let people: Vec<NewPerson> = serde_json::from_str(json)?;
    if people.is_empty() {
        return Err(CliError::Input("no people to create".to_string()));
    }
    Ok(people)
}

/// Run the find command
pub async fn find(global: &GlobalArgs, args: NameArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let people = ops::find_people_by_name(session.repo.as_ref(), &args.name).await?;
    print_people("People found", &people)
}

/// Run the find-one command
pub async fn find_one(global: &GlobalArgs, args: FoodArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let person = ops::find_one_by_food(session.repo.as_ref(), &args.food).await?;
    print_person("Person found", person.as_ref())
}

/// Run the get command
pub async fn get(global: &GlobalArgs, args: IdArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let person = ops::find_person_by_id(session.repo.as_ref(), &args.id).await?;
    print_person("Person found by ID", person.as_ref())
}

/// Run the add-food command
pub async fn add_food(global: &GlobalArgs, args: AddFoodArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let person = ops::find_edit_then_save(session.repo.as_ref(), &args.id, &args.food).await?;
    print_person("Updated person", Some(&person))
}

/// Run the set-age command
pub async fn set_age(global: &GlobalArgs, args: SetAgeArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let person = ops::find_and_update(session.repo.as_ref(), &args.name, args.age).await?;
    print_person("Updated person", person.as_ref())
}

/// Run the delete command
pub async fn delete(global: &GlobalArgs, args: IdArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let person = ops::delete_by_id(session.repo.as_ref(), &args.id).await?;
    print_person("Person deleted", person.as_ref())
}

/// Run the delete-many command
pub async fn delete_many(global: &GlobalArgs, args: NameArgs) -> CliResult<()> {
    let session = connect(global).await?;
    let summary = ops::delete_many_people(session.repo.as_ref(), &args.name).await?;
    output::success(&format!("People deleted: {}", summary.deleted_count));
    output::json(&serde_json::to_value(summary)?);
    Ok(())
}

/// Build the query described by the command arguments.
pub fn build_query(args: &QueryArgs) -> PersonQuery {
    let mut query = PersonQuery::new(filter::has_food(&args.food))
        .sort(args.sort.as_str())
        .limit(args.limit)
        .select(args.select.as_str());
    if let Some(skip) = args.skip {
        query = query.skip(skip);
    }
    query
}

/// Run the query command
pub async fn query(global: &GlobalArgs, args: QueryArgs) -> CliResult<()> {
    let query = build_query(&args);
    // Reject bad specs before connecting.
    query.find_options()?;

    let session = connect(global).await?;
    let people = session.repo.query(query).await?;
    print_people("Query result", &people)
}
