pub mod account;
pub mod api;
pub mod api_types;
pub mod cache;
pub mod debounce;
pub mod grammar;
pub mod languages;
pub mod library;
pub mod local_store;
pub mod session;
pub mod speech;
pub mod store;
pub mod translate;

#[cfg(test)]
pub mod testing;
