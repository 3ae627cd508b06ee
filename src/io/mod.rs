pub mod config_io;
pub mod library_io;
pub mod recovery;
pub mod state;
pub mod store;
