//! Entities mirrored from the booking backend and the views derived from them.

pub mod agenda;
pub mod appointment;
pub mod auth;
pub mod availability;
pub mod barber;
pub mod block;
pub mod business;
pub mod cash;
pub mod catalog;
pub mod client;
pub mod message;
pub mod reminder;
pub mod types;
