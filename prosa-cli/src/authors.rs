use clap::{App, Arg, ArgMatches, SubCommand};

use prosa_models::{
    authors::{Author, NewAuthor},
    Connection,
};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("authors")
        .about("Manage the literary authors posts can link to")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .takes_value(true)
                        .help("The author's full name"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("URL slug, defaults to a kebab-cased name"),
                )
                .arg(
                    Arg::with_name("bio")
                        .short("b")
                        .long("bio")
                        .takes_value(true)
                        .help("A short biography"),
                )
                .about("Register a new author"),
        )
        .subcommand(SubCommand::with_name("list").about("List all authors"))
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("list", _) => list(conn),
        _ => println!("Unknown subcommand"),
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let name = args
        .value_of("name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Name"));
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| slugify(&name));
    let bio = args.value_of("bio").map(String::from);

    let author = Author::insert(conn, NewAuthor { name, slug, bio })
        .expect("Couldn't save the new author");
    println!("Created author {} (id {})", author.slug, author.id);
}

fn list(conn: &Connection) {
    for author in Author::list(conn).expect("Couldn't list authors") {
        println!("{:>4}  {:<24} {}", author.id, author.slug, author.name);
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("Machado de Assis"), "machado-de-assis");
        assert_eq!(slugify("  Clarice  Lispector  "), "clarice-lispector");
        assert_eq!(slugify("José"), "josé");
    }
}
