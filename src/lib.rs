#![warn(missing_docs)]
//! Herald is an event-callback receiver that relays monitoring alerts to
//! configured delivery channels: external commands, e-mail, SMS gateways,
//! or the log.

pub mod config;
pub mod http_server;
pub mod models;
pub mod plugins;
pub mod test_helpers;
