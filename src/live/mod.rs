pub mod events;
pub mod handlers;
pub mod registry;
pub mod rooms;
pub mod scoring;
