use clap::{App, Arg, ArgMatches, SubCommand};

use prosa_models::{posts::Post, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("posts")
        .about("Manage posts")
        .subcommand(
            SubCommand::with_name("list")
                .arg(
                    Arg::with_name("limit")
                        .short("l")
                        .long("limit")
                        .takes_value(true)
                        .help("How many recent posts to show (default 20)"),
                )
                .about("List the most recently updated posts"),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .arg(
                    Arg::with_name("id")
                        .short("i")
                        .long("id")
                        .takes_value(true)
                        .required(true)
                        .help("The id of the post to delete"),
                )
                .about("Hard-delete a post"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("list", Some(x)) => list(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        _ => println!("Unknown subcommand"),
    }
}

fn list<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let limit = args
        .value_of("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    for post in Post::recents(conn, limit).expect("Couldn't list posts") {
        println!(
            "{:>4}  {} {:<10} {}",
            post.id,
            if post.featured { "*" } else { " " },
            post.tag.as_deref().unwrap_or("-"),
            post.name,
        );
    }
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let id = args
        .value_of("id")
        .and_then(|id| id.parse().ok())
        .expect("Invalid id");
    let post = Post::get(conn, id).expect("No post with this id");
    post.delete(conn).expect("Couldn't delete the post");
    println!("Deleted {}", post.name);
}
