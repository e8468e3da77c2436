//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE_NAME;
use crate::demo::{self, DemoPlan};

/// People CLI - basic document operations on a Person collection
#[derive(Parser, Debug)]
#[command(name = "people")]
#[command(version)]
#[command(
    about = "People CLI - basic MongoDB document operations on a Person collection",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Connection and output options shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// MongoDB connection string
    #[arg(long, global = true, env = "MONGO_URI", hide_env_values = true)]
    pub uri: Option<String>,

    /// Database name (defaults to the one in the URI, then "test")
    #[arg(long, global = true, env = "MONGO_DB")]
    pub database: Option<String>,

    /// Collection name (defaults to "people")
    #[arg(long, global = true, env = "MONGO_COLLECTION")]
    pub collection: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Use an in-memory collection instead of a server
    #[arg(long, global = true)]
    pub memory: bool,

    /// Connect and server selection timeout in seconds [default: 10]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every example operation in order
    Demo(DemoArgs),

    /// Create and save one person
    Create(CreateArgs),

    /// Create several people at once
    CreateMany(CreateManyArgs),

    /// Find all people with a name
    Find(NameArgs),

    /// Find one person who likes a food
    FindOne(FoodArgs),

    /// Find a person by id
    Get(IdArgs),

    /// Add a favorite food by reading, editing and saving a person
    AddFood(AddFoodArgs),

    /// Atomically set the age of the first person with a name
    SetAge(SetAgeArgs),

    /// Delete a person by id
    Delete(IdArgs),

    /// Delete all people with a name
    DeleteMany(NameArgs),

    /// Run a filtered, sorted, paginated and projected query
    Query(QueryArgs),

    /// Check that the server is reachable
    Ping,

    /// Display version information
    Version,
}

// =============================================================================
// Demo Command
// =============================================================================

/// Arguments for the `demo` command
#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Name looked up by the find step
    #[arg(long, default_value = demo::DEFAULT_FIND_NAME)]
    pub find_name: String,

    /// Food looked up by the find-one step
    #[arg(long, default_value = demo::DEFAULT_FIND_FOOD)]
    pub find_food: String,

    /// Id used by the find-by-id, edit and delete steps
    #[arg(long, default_value = demo::DEFAULT_TARGET_ID)]
    pub id: String,

    /// Use the id of the person created in the first step instead of --id
    #[arg(long)]
    pub use_inserted_id: bool,

    /// Food appended by the edit step
    #[arg(long, default_value = demo::DEFAULT_ADDED_FOOD)]
    pub add_food: String,

    /// Name targeted by the update step
    #[arg(long, default_value = demo::DEFAULT_UPDATE_NAME)]
    pub update_name: String,

    /// Age set by the update step
    #[arg(long, default_value_t = demo::DEFAULT_UPDATE_AGE)]
    pub age: i32,

    /// Name removed by the delete-many step
    #[arg(long, default_value = demo::DEFAULT_DELETE_NAME)]
    pub delete_name: String,

    /// Food used by the chained query step
    #[arg(long, default_value = demo::DEFAULT_QUERY_FOOD)]
    pub query_food: String,
}

impl From<DemoArgs> for DemoPlan {
    fn from(args: DemoArgs) -> Self {
        DemoPlan {
            find_name: args.find_name,
            find_food: args.find_food,
            target_id: args.id,
            use_inserted_id: args.use_inserted_id,
            added_food: args.add_food,
            update_name: args.update_name,
            update_age: args.age,
            delete_name: args.delete_name,
            query_food: args.query_food,
            ..DemoPlan::default()
        }
    }
}

// =============================================================================
// Record Commands
// =============================================================================

/// Arguments for the `create` command
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Name of the person
    pub name: String,

    /// Age in years
    #[arg(short, long)]
    pub age: Option<i32>,

    /// Favorite foods (comma separated or repeated)
    #[arg(short, long = "food", value_delimiter = ',')]
    pub foods: Vec<String>,
}

/// Arguments for the `create-many` command
#[derive(Args, Debug, Clone)]
pub struct CreateManyArgs {
    /// JSON file holding an array of people; the sample people when omitted
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// A name argument
#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    /// Name to match
    pub name: String,
}

/// A food argument
#[derive(Args, Debug, Clone)]
pub struct FoodArgs {
    /// Food to match against favorite foods
    pub food: String,
}

/// An id argument
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Hex ObjectId of the person
    pub id: String,
}

/// Arguments for the `add-food` command
#[derive(Args, Debug, Clone)]
pub struct AddFoodArgs {
    /// Hex ObjectId of the person
    pub id: String,

    /// Food to append
    #[arg(default_value = demo::DEFAULT_ADDED_FOOD)]
    pub food: String,
}

/// Arguments for the `set-age` command
#[derive(Args, Debug, Clone)]
pub struct SetAgeArgs {
    /// Name to match
    pub name: String,

    /// New age
    #[arg(default_value_t = demo::DEFAULT_UPDATE_AGE)]
    pub age: i32,
}

/// Arguments for the `query` command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Food to match against favorite foods
    #[arg(long, default_value = demo::DEFAULT_QUERY_FOOD)]
    pub food: String,

    /// Sort spec, e.g. "name" or "-age name"
    #[arg(long, default_value = "name", allow_hyphen_values = true)]
    pub sort: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 2)]
    pub limit: i64,

    /// Number of results to skip
    #[arg(long)]
    pub skip: Option<u64>,

    /// Projection spec, e.g. "-age" or "name favoriteFoods"
    #[arg(long, default_value = "-age", allow_hyphen_values = true)]
    pub select: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_demo_defaults() {
        let cli = Cli::try_parse_from(["people", "--memory", "demo"]).unwrap();
        assert!(cli.global.memory);
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        let plan = DemoPlan::from(args);
        assert_eq!(plan, DemoPlan::default());
    }

    #[test]
    fn test_parse_create_with_foods() {
        let cli = Cli::try_parse_from([
            "people", "create", "Dana", "--age", "41", "--food", "Soup,Bread", "--food", "Tea",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create command");
        };
        assert_eq!(args.name, "Dana");
        assert_eq!(args.age, Some(41));
        assert_eq!(args.foods, vec!["Soup", "Bread", "Tea"]);
    }

    #[test]
    fn test_parse_query_with_hyphenated_specs() {
        let cli = Cli::try_parse_from([
            "people", "query", "--sort", "-age", "--select", "-age", "--limit", "5",
        ])
        .unwrap();
        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.sort, "-age");
        assert_eq!(args.select, "-age");
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["people", "find", "Alice", "--collection", "persons", "-vv"])
            .unwrap();
        assert_eq!(cli.global.collection.as_deref(), Some("persons"));
        assert_eq!(cli.global.verbose, 2);
    }
}
