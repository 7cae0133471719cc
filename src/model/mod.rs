pub mod entry;
pub mod grammar;
pub mod settings;
pub mod translation;
