//! Log output for the quiz service.
//!
//! Two targets carry the service's own events:
//!   - `fretquiz`: startup, config loading, the difficulty catalog, WebSocket
//!     connects/disconnects, rejected bodies and session eviction.
//!   - `question`: generated questions, revealed answers, difficulty changes.
//!
//! `LOG_LEVEL` takes an `EnvFilter` directive string; by default both targets
//! log at debug and the HTTP stack at info. `LOG_FORMAT=json` switches to one
//! JSON object per line for log shippers.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
        EnvFilter::new("info,question=debug,fretquiz=debug,tower_http=info,axum=info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
