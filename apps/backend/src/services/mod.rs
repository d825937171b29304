pub mod broadcaster;
pub mod controller;
pub mod game_flow;
pub mod storyteller;
pub mod views;
