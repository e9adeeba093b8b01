// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth gateway for tgnotify.
//!
//! Serves the browser half of chat linking: `/redirect` sends the user to
//! the site's authorize page, `/callback` exchanges the code and links the
//! chat that minted the state. Also exposes `/health` and `/metrics`.

pub mod exchange;
pub mod handlers;
pub mod server;

pub use exchange::{ExchangeError, HttpTokenExchange, TokenExchange};
pub use server::{GatewayState, OAuthLinks, ServerConfig, build_router, start_server};
