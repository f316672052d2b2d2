pub mod profile;
pub mod providers;
pub mod sample;
