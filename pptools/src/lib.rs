pub mod app_paths;
pub mod compress;
pub mod config;
pub mod decompress;
pub mod inspect;
pub mod logging;
pub mod text_io;
