pub mod app;
pub mod battery;
pub mod config;
pub mod keymap;
pub mod launcher;
pub mod menu;
pub mod paths;
pub mod render;
pub mod terminal;
pub mod theme;
