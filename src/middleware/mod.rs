//! Request middleware for the Vitrin API.

pub mod auth;
