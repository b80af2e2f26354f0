pub mod notifications;
pub mod recovery;
pub mod suggestions;
