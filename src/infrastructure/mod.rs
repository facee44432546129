pub mod inline;
pub mod worker;
