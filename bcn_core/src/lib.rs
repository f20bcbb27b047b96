//! This crate fetches the household bin collection schedule of the Vale of White Horse council
//! and sends a reminder to the configured notification channels.
//!
//! The schedule is read from <https://eform.southoxon.gov.uk/ebase/BINZONE_DESKTOP.eb>.

pub mod bin_client;
pub mod collection;
pub mod config;
pub mod http;
pub mod notifier;
