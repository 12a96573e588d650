pub mod basket;
pub mod catalog;
pub mod challenge;
pub mod feedback;
pub mod user;
