//! Domain layer: core entities and business rules.

pub mod auth_form;
pub mod chat_session;
pub mod events;
pub mod home_state;
pub mod message;
pub mod message_list;
pub mod notification;
pub mod profile;
pub mod role;
pub mod room;
pub mod session;
pub mod shell_state;
pub mod swipe;
pub mod text_field;

