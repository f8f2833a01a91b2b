use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

fn fmt_enabled_env() -> bool {
    env::var("CLOUDINIT_ENV_TRACING_FMT").ok().as_deref() != Some("0")
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Returns true when this call installed it. Later calls, `CLOUDINIT_ENV_TRACING_FMT=0`, or an
/// already-installed global subscriber leave things as they are.
pub fn init_tracing() -> bool {
    if INIT.get().is_some() || !fmt_enabled_env() {
        return false;
    }

    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(filter);
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("cloudinit-env: tracing init skipped (global subscriber already set)");
        let _ = INIT.set(());
        return false;
    }

    let _ = INIT.set(());
    true
}
