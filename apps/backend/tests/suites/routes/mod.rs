pub mod health;
pub mod intents;
pub mod realtime;
pub mod view;
