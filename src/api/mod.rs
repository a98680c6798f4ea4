//! HTTP handlers for the catalog pages and forms.
//!
//! GET pages answer with the page model a renderer would consume. POST form
//! submissions answer with a 303 redirect on success, a re-rendered form
//! payload (422) when validation fails, or the delete-confirmation payload
//! (200) when a deletion is blocked by dependents.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod openapi;
