// Storage layer (local project folders)

pub mod projects;

pub use projects::*;
