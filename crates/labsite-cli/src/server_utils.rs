use std::{
    net::{IpAddr, SocketAddr},
    time::{Duration, Instant},
};

use axum::{
    body::Body,
    extract::Request,
    http::Uri,
    middleware::Next,
    response::Response,
};
use colored::Colorize;
use labsite::logging::{FormatElapsedTimeOptions, format_elapsed_time};
use local_ip_address::local_ip;
use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpSocket};
use tower_http::trace::OnResponse;
use tracing::Span;

pub const DEFAULT_PORT: u16 = 3000;

pub fn log_server_start(start_time: Instant, host: bool, addr: SocketAddr, server_type: &str) {
    info!(target: "SKIP_FORMAT", "");
    let elapsed_time = format_elapsed_time(start_time.elapsed(), &FormatElapsedTimeOptions::default());
    info!(target: "SKIP_FORMAT", "{} {}", "labsite".bold().bright_green(), format!("{} server started in {}", server_type, elapsed_time));
    info!(target: "SKIP_FORMAT", "");

    let port = addr.port();
    let url = format!("\x1b]8;;http://localhost:{port}\x1b\\http://localhost:{port}\x1b]8;;\x1b\\")
        .bold()
        .underline()
        .bright_blue();
    let network_url = if host {
        match local_ip() {
            Ok(local_ip) => format!(
                "\x1b]8;;http://{local_ip}:{port}\x1b\\http://{local_ip}:{port}\x1b]8;;\x1b\\"
            )
            .bold()
            .underline()
            .bright_magenta(),
            Err(err) => format!("Could not determine the local IP address: {err}").yellow(),
        }
    } else {
        "Use --host to expose the server to your network".dimmed()
    };
    info!(target: "SKIP_FORMAT", "🮔  {}    {}", "Local".bold(), url);
    info!(target: "SKIP_FORMAT", "🮔  {}  {}", "Network".bold(), network_url);
    info!(target: "SKIP_FORMAT", "");

    info!(target: "server", "{}", "waiting for requests...".dimmed());
}

/// Copies the request URI into the response so [`CustomOnResponse`] can log it.
pub async fn insert_request_uri(req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    let mut res = next.run(req).await;

    res.extensions_mut().insert(uri);
    res
}

#[derive(Clone, Debug)]
pub struct CustomOnResponse;

impl OnResponse<Body> for CustomOnResponse {
    fn on_response(self, response: &Response<Body>, latency: Duration, _span: &Span) {
        let status = response.status();

        // Skip informational responses
        if status.is_informational() {
            return;
        }

        let status = if status.is_server_error() {
            status.to_string().red()
        } else if status.is_client_error() {
            status.to_string().yellow()
        } else {
            status.to_string().green()
        };

        let uri = response
            .extensions()
            .get::<Uri>()
            .map(Uri::to_string)
            .unwrap_or_default()
            .bold();

        let latency = format_elapsed_time(latency, &FormatElapsedTimeOptions::default());

        info!(target: "server", "{} {} {}", status, uri, latency);
    }
}

/// Binds to the first free port starting at `starting_port`.
pub async fn bind_open_port(address: IpAddr, starting_port: u16) -> std::io::Result<TcpListener> {
    let mut port = starting_port;

    loop {
        let socket = if address.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        match socket.bind(SocketAddr::new(address, port)) {
            Ok(()) => {
                debug!(target: "server", "Found open port: {}", port);
                return socket.listen(1024);
            }
            Err(err) if port < u16::MAX => {
                debug!(target: "server", "Port {} is already in use or failed to bind ({}), trying next one", port, err);
                port += 1;
            }
            Err(err) => {
                warn!(target: "server", "No open port found after {}", starting_port);
                return Err(err);
            }
        }
    }
}

pub fn listen_address(host: bool) -> IpAddr {
    if host {
        IpAddr::from([0, 0, 0, 0])
    } else {
        IpAddr::from([127, 0, 0, 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_open_port_skips_used_ports() {
        let address = listen_address(false);
        let taken = bind_open_port(address, 41_000).await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let next = bind_open_port(address, taken_port).await.unwrap();

        assert!(next.local_addr().unwrap().port() > taken_port);
    }
}
