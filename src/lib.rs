//! Emberton library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point. This
//! library crate exposes the same modules so that `tests/` integration
//! tests can import game types, systems, and resources without a window.

pub mod shared;
pub mod calendar;
pub mod events;
pub mod combat;
pub mod jobs;
pub mod business;
pub mod economy;
pub mod farming;
pub mod crafting;
pub mod companion;
pub mod quests;
pub mod save;
pub mod pathfinding;
pub mod world;
pub mod home;
pub mod data;
