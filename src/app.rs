pub mod chain_client;
pub mod history;
pub mod in_memory_store;
pub mod live;
pub mod pages;
pub mod record_store;
pub mod session;
pub mod settlement;
pub mod sled_store;
pub mod subscriptions;


#[allow(unused)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
