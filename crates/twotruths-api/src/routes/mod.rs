//! Route modules organized by game surface.

pub mod health;
pub mod presentation;
pub mod scores;
pub mod sessions;
pub mod statements;
pub mod users;
pub mod votes;
