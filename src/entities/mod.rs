pub mod actor;
pub mod category;
pub mod film;
pub mod film_actor;
pub mod film_category;
pub mod search_log;
