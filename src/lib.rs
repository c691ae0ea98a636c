pub mod board;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod terminal_runtime;
pub mod ui;
pub mod worm;
