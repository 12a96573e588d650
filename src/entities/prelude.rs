pub use super::addresses::Entity as Addresses;
pub use super::basket_items::Entity as BasketItems;
pub use super::baskets::Entity as Baskets;
pub use super::cards::Entity as Cards;
pub use super::challenges::Entity as Challenges;
pub use super::complaints::Entity as Complaints;
pub use super::delivery_methods::Entity as DeliveryMethods;
pub use super::feedbacks::Entity as Feedbacks;
pub use super::hints::Entity as Hints;
pub use super::memories::Entity as Memories;
pub use super::orders::Entity as Orders;
pub use super::products::Entity as Products;
pub use super::quantities::Entity as Quantities;
pub use super::recycles::Entity as Recycles;
pub use super::security_answers::Entity as SecurityAnswers;
pub use super::security_questions::Entity as SecurityQuestions;
pub use super::users::Entity as Users;
pub use super::wallets::Entity as Wallets;
