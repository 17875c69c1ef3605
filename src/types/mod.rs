pub mod contact;
pub mod counter;
pub mod link;
