#![feature(proc_macro_hygiene, decl_macro)]

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_json;

use prosa_models::{db_conn::init_pool, CONFIG};

mod api;
mod routes;

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let dbpool = init_pool().expect("main: database pool initialization error");
    let rocket_config = CONFIG
        .rocket
        .clone()
        .expect("main: invalid Rocket configuration, please set ROCKET_SECRET_KEY");

    rocket::custom(rocket_config)
        .mount(
            "/",
            routes![
                routes::static_files,
                routes::editor_new,
                routes::editor_edit,
                routes::feed,
            ],
        )
        .mount(
            "/api/",
            routes![
                api::session::create,
                api::session::delete,
                api::account::set_avatar,
                api::authors::list,
                api::posts::list,
                api::posts::details,
                api::posts::create,
                api::posts::update,
                api::posts::set_featured,
                api::posts::delete,
            ],
        )
        .register(catchers![
            routes::errors::unauthorized,
            routes::errors::forbidden,
            routes::errors::not_found,
            routes::errors::server_error,
        ])
        .manage(dbpool)
        .launch();
}
