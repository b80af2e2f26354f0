pub mod admin_gate;
pub mod auth;
pub mod csrf;
pub mod request_id;
