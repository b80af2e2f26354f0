pub mod account_link;
pub mod coach;
pub mod interaction;
pub mod notification;
pub mod offer;
pub mod recovery;
pub mod school;
pub mod suggestion;
pub mod task;
pub mod user;
