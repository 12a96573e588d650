pub mod prelude;

pub mod addresses;
pub mod basket_items;
pub mod baskets;
pub mod cards;
pub mod challenges;
pub mod complaints;
pub mod delivery_methods;
pub mod feedbacks;
pub mod hints;
pub mod memories;
pub mod orders;
pub mod products;
pub mod quantities;
pub mod recycles;
pub mod security_answers;
pub mod security_questions;
pub mod users;
pub mod wallets;
