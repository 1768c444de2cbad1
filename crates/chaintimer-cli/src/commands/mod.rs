pub mod group;
pub mod settings;
pub mod timer;
