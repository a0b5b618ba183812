#[macro_use]
extern crate diesel_migrations;

use clap::App;
use diesel::Connection;
use prosa_models::{Connection as Conn, CONFIG};
use std::io::{self, prelude::*};

mod authors;
mod migration;
mod posts;
mod users;

fn main() {
    let mut app = App::new("Prosa CLI")
        .bin_name("prs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collection of tools to manage your Prosa instance.")
        .subcommand(authors::command())
        .subcommand(migration::command())
        .subcommand(posts::command())
        .subcommand(users::command());
    let matches = app.clone().get_matches();

    match dotenv::dotenv() {
        Ok(path) => println!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => eprintln!("no .env was found"),
        e => e.map(|_| ()).unwrap(),
    }
    let conn = Conn::establish(CONFIG.database_url.as_str());

    match matches.subcommand() {
        ("authors", Some(args)) => {
            authors::run(args, &conn.expect("Couldn't connect to the database."))
        }
        ("migration", Some(args)) => {
            migration::run(args, &conn.expect("Couldn't connect to the database."))
        }
        ("posts", Some(args)) => {
            posts::run(args, &conn.expect("Couldn't connect to the database."))
        }
        ("users", Some(args)) => {
            users::run(args, &conn.expect("Couldn't connect to the database."))
        }
        _ => app.print_help().expect("Couldn't print help"),
    };
}

pub fn ask_for(something: &str) -> String {
    print!("{}: ", something);
    io::stdout().flush().expect("Couldn't flush STDOUT");
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Unable to read line");
    input.retain(|c| c != '\n');
    input
}
