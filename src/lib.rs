pub mod model;
pub mod service;
pub mod tui;

pub mod cli {
    pub mod commands;
    pub mod handlers;
    pub mod output;
}

pub mod io {
    pub mod config_io;
    pub mod data_dir;
    pub mod recovery;
    pub mod session;
    pub mod store;
    pub mod watcher;
}

pub mod ops {
    pub mod analytics;
    pub mod board;
    pub mod filter;
    pub mod lifecycle;
    pub mod project_ops;
}

pub mod util {
    pub mod unicode;
}
