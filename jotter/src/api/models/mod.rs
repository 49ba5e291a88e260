pub mod notes;
pub mod users;
pub mod validation;
