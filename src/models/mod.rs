pub mod due;
pub mod grouping;
pub mod order;
pub mod restaurant;
pub mod settings;
pub mod user;
