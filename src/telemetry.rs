use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt as _, util::SubscriberInitExt as _};

// Initialize tracing-subscriber with a console layer on stderr, filtered by
// RUST_LOG so pipeline output on stdout stays clean.
pub fn init_tracing_subscriber() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();
}
