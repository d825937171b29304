pub mod db;
pub mod storyteller;
