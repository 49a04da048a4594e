pub mod actions;
pub mod adapters;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod gallery;
pub mod spring;
pub mod tasks {
    pub mod animator;
    pub mod session;
    pub mod terminal;
}
