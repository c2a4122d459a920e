//! # Web API Handlers

pub mod github;
pub mod health;
pub mod invites;
pub mod membership;
