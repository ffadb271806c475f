pub mod app;

pub mod events;

pub mod network;

pub mod records;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
