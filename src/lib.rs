pub mod app;
pub mod chat;
pub mod github;
pub mod reminder;
pub mod util;
