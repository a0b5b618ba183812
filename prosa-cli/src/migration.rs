use clap::{App, ArgMatches, SubCommand};

use prosa_models::Connection;

#[cfg(feature = "postgres")]
embed_migrations!("../migrations/postgres");
#[cfg(feature = "sqlite")]
embed_migrations!("../migrations/sqlite");

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("migration")
        .about("Manage migrations")
        .subcommand(SubCommand::with_name("run").about("Run pending migrations"))
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("run", _) => embedded_migrations::run_with_output(conn, &mut std::io::stdout())
            .expect("Couldn't run migrations"),
        _ => println!("Unknown subcommand"),
    }
}
