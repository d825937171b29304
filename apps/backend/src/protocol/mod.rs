//! Wire shapes shared by the HTTP and websocket surfaces.

pub mod intent;
pub mod view;
