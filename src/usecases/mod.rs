//! Use case layer: application workflows and orchestration.

pub mod auth;
pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod guided_auth;
pub mod list_rooms;
pub mod load_home;
pub mod load_messages;
pub mod logout;
pub mod send_message;
pub mod shell;
pub mod startup;
pub mod tasks;
