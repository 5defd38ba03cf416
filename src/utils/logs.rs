// Installs the JSON log formatter for applications embedding the library desk.
// Calling it again after a subscriber is installed is a no-op.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // collectors parse these lines, keep them free of ANSI color codes.
        .with_ansi(false)
        // the collector adds its own ingestion time.
        .without_time()
        .json()
        .try_init();
}
