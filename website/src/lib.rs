pub mod content;
pub mod layout;
pub mod pages;
pub mod routes;
