pub mod history;
pub mod menu;
pub mod practice_area;
pub mod progress_bar;
pub mod settings;
pub mod summary;
