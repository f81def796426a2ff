pub mod environment;
pub mod terminal;

pub use environment::{get_data_dir, get_previews_dir};
pub use terminal::strip_ansi_codes;
