//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! Levels come from `RUST_LOG`; the compact format hides the module prefix
//! (`with_target(false)`) and shows spans inline.
//!
//! ```bash
//! # Order lifecycle and snapshot saves
//! RUST_LOG=info cargo run
//!
//! # Full payloads: actor requests, assistant replies, snapshot sizes
//! RUST_LOG=debug cargo run
//!
//! # Only the assistant adapter
//! RUST_LOG=cafe_orders::assistant=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, placing and approving an order reads:
//!
//! ```text
//! INFO Created entity_type="Order" id=order-1760871234567 size=1
//! INFO handle_user_message: Order placed from conversation order_id=order-1760871234567
//! INFO Action ok entity_type="Order" id=order-1760871234567
//! ```
//!
//! Logs go to stderr so they never interleave with the chat on stdout.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
