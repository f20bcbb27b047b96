//! The HTTP client shared by the fetch and the notification channels.

use std::time::Duration;

use reqwest::Client;

/// Timeout applied to every network call.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client, every request bounded by [`TIMEOUT`].
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(TIMEOUT).build()
}
