mod handlers;
mod main_menu;
mod options_editor;

pub use main_menu::{MenuSession, show_main_menu};
