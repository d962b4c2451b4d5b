pub mod ai;
pub mod assets;
pub mod auth;
pub mod media;
pub mod reports;
pub mod rooms;
pub mod shopping;
pub mod tasks;
