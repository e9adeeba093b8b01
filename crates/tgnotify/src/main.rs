// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! tgnotify - pushes Bangumi private messages and notifications to Telegram.
//!
//! Configuration comes from TOML files and environment variables only; the
//! binary takes no command-line flags.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

#[tokio::main]
async fn main() {
    let config = match tgnotify_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tgnotify_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    if let Err(e) = serve::run_serve(config).await {
        tracing::error!(error = %e, "tgnotify failed to start");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
