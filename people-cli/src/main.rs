//! People CLI - basic MongoDB document operations on a Person collection.

use clap::Parser;

use people_cli::cli::{Cli, Command};
use people_cli::commands;
use people_cli::error::CliResult;
use people_cli::{logging, output};

#[tokio::main]
async fn main() {
    // Values from .env must be visible before clap reads the environment
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let global = &cli.global;
    match cli.command {
        Command::Demo(args) => commands::demo::run(global, args).await,
        Command::Create(args) => commands::person::create(global, args).await,
        Command::CreateMany(args) => commands::person::create_many(global, args).await,
        Command::Find(args) => commands::person::find(global, args).await,
        Command::FindOne(args) => commands::person::find_one(global, args).await,
        Command::Get(args) => commands::person::get(global, args).await,
        Command::AddFood(args) => commands::person::add_food(global, args).await,
        Command::SetAge(args) => commands::person::set_age(global, args).await,
        Command::Delete(args) => commands::person::delete(global, args).await,
        Command::DeleteMany(args) => commands::person::delete_many(global, args).await,
        Command::Query(args) => commands::person::query(global, args).await,
        Command::Ping => commands::ping::run(global).await,
        Command::Version => commands::version::run().await,
    }
}
