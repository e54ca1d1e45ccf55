// apcommand-api: HTTP form transport and page scraping for Broadcom reference APs,
// plus the telnet shell transport for Atheros reference APs

pub mod client;
pub mod error;
pub mod form;
pub mod line;
pub mod scrape;
pub mod telnet;
pub mod transport;

pub use client::HttpClient;
pub use error::Error;
pub use form::{FieldPayload, FormTransport};
pub use line::{LineOutput, LineTransport};
pub use telnet::TelnetClient;
pub use transport::TransportConfig;
