//!# ds-down
//!
//! Hands a URL, magnet link or local torrent file to a Synology Download
//! Station so the device starts downloading it.
//!
//! The credentials come from a small `key = value` file, by default
//! `~/.config/ds-down.conf`:
//!
//! ```text
//! username = alice
//! host = https://nas.local:5001
//! passwordeval = pass show nas/alice
//! ```
//!
//! `passwordeval` is run and the last line it prints is used as the password.
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use ds_down::client::SynoDS;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let mut synods = SynoDS::builder()
//!         .host("https://nas.local:5001")
//!         .username("alice")
//!         .password("secret")
//!         .build()?;
//!
//!     synods.login().await?;
//!     let created = synods.create_task("magnet:?xt=urn:btih:c9e15763").await;
//!     synods.logout().await?;
//!     created
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod entities;
pub mod password;
pub mod send;
pub mod target;
pub mod utils;
