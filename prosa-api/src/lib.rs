extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod accounts;
pub mod authors;
pub mod posts;
pub mod sessions;
