pub mod composer;
pub mod config;
pub mod drafts;
pub mod message;
pub mod transcript;
