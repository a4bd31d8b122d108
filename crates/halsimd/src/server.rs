//! Endpoint lifecycle and the serve loop.

use crate::config::HalSimConfig;
use crate::service::HalSimService;
use crate::wire::{SimRequest, SimResponse};
use futures::{SinkExt, StreamExt};
use p4hal_events::EventRegistry;
use p4hal_types::{ErrorCode, HalError, HalResult};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, info, warn};

/// Requests are single JSON lines; anything longer is a protocol violation.
const MAX_LINE_LENGTH: usize = 64 * 1024;

#[derive(Default)]
struct ServerState {
    started: bool,
    local_addr: Option<SocketAddr>,
    shutdown_tx: Option<watch::Sender<bool>>,
    serve_handle: Option<JoinHandle<()>>,
}

/// The listening endpoint for inbound event requests.
///
/// Constructed once by the composition root and shared from there; the
/// process owns exactly one. The lifecycle is one-shot: [`start`] brings the
/// endpoint up exactly once (a second call fails with `Aborted`, leaving the
/// first endpoint serving), [`shutdown`] tears it down and the instance
/// cannot be started again.
///
/// [`start`]: HalSimServer::start
/// [`shutdown`]: HalSimServer::shutdown
pub struct HalSimServer {
    config: HalSimConfig,
    service: HalSimService,
    state: Mutex<ServerState>,
}

impl HalSimServer {
    pub fn new(config: HalSimConfig, registry: Arc<EventRegistry>) -> Self {
        Self {
            config,
            service: HalSimService::new(registry),
            state: Mutex::new(ServerState::default()),
        }
    }

    /// Binds the configured listen address and spawns the serve loop.
    ///
    /// Fails with `Aborted` if the endpoint was already started and with
    /// `Internal` if the address cannot be bound; a failed bind leaves the
    /// server startable again.
    pub async fn start(&self) -> HalResult<()> {
        {
            let mut state = self.state.lock();
            if state.started {
                return Err(HalError::aborted("event endpoint already started"));
            }
            state.started = true;
        }

        let listener = match TcpListener::bind(&self.config.listen_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                self.state.lock().started = false;
                return Err(HalError::internal(format!(
                    "failed to bind event endpoint {}: {}",
                    self.config.listen_addr, e
                )));
            }
        };
        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                self.state.lock().started = false;
                return Err(HalError::internal(format!(
                    "failed to read bound address: {}",
                    e
                )));
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(accept_loop(
            listener,
            self.service.clone(),
            shutdown_rx,
            self.config.client_idle_timeout(),
            self.config.client_write_timeout(),
        ));

        let mut state = self.state.lock();
        state.local_addr = Some(local_addr);
        state.shutdown_tx = Some(shutdown_tx);
        state.serve_handle = Some(handle);
        info!(addr = %local_addr, "event endpoint listening");
        Ok(())
    }

    /// Requests graceful termination of the endpoint and waits for the
    /// serve loop to exit.
    ///
    /// Fails with `Aborted` if the endpoint was never started; repeating a
    /// shutdown is harmless.
    pub async fn shutdown(&self) -> HalResult<()> {
        let (shutdown_tx, serve_handle) = {
            let mut state = self.state.lock();
            if !state.started {
                return Err(HalError::aborted("event endpoint was never started"));
            }
            (state.shutdown_tx.take(), state.serve_handle.take())
        };

        if let Some(tx) = shutdown_tx {
            let _ = tx.send(true);
        }
        if let Some(handle) = serve_handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "serve loop ended abnormally");
            }
            info!("event endpoint stopped");
        }
        Ok(())
    }

    /// The address the endpoint is bound to, once started. With an
    /// ephemeral port in the config this is where the port shows up.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.state.lock().local_addr
    }
}

async fn accept_loop(
    listener: TcpListener,
    service: HalSimService,
    mut shutdown_rx: watch::Receiver<bool>,
    idle_timeout: Duration,
    write_timeout: Duration,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("event endpoint shutting down");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "client connected");
                        tokio::spawn(serve_connection(
                            stream,
                            peer,
                            service.clone(),
                            shutdown_rx.clone(),
                            idle_timeout,
                            write_timeout,
                        ));
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                    }
                }
            }
        }
    }
}

/// One JSON request per line, one JSON response per line. A malformed
/// request earns an `INVALID_ARGUMENT` response and the connection stays
/// open; framing errors close it, as does running out of either budget:
/// the idle budget on reads, the write budget on a peer that stops
/// draining its responses.
async fn serve_connection<S>(
    stream: S,
    peer: SocketAddr,
    service: HalSimService,
    mut shutdown_rx: watch::Receiver<bool>,
    idle_timeout: Duration,
    write_timeout: Duration,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            next = timeout(idle_timeout, framed.next()) => {
                match next {
                    Err(_) => {
                        debug!(%peer, "closing idle connection");
                        break;
                    }
                    Ok(None) => {
                        debug!(%peer, "client disconnected");
                        break;
                    }
                    Ok(Some(Err(e))) => {
                        warn!(%peer, error = %e, "connection framing error");
                        break;
                    }
                    Ok(Some(Ok(line))) => {
                        let response = match serde_json::from_str::<SimRequest>(&line) {
                            Ok(request) => service.handle_request(request).await,
                            Err(e) => SimResponse::error(
                                ErrorCode::InvalidArgument,
                                format!("malformed request: {}", e),
                            ),
                        };
                        let Ok(encoded) = serde_json::to_string(&response) else {
                            warn!(%peer, "failed to encode response");
                            break;
                        };
                        match timeout(write_timeout, framed.send(encoded)).await {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => {
                                warn!(%peer, error = %e, "failed to write response");
                                break;
                            }
                            Err(_) => {
                                warn!(%peer, "client stopped reading, closing connection");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_server() -> HalSimServer {
        let config = HalSimConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            ..Default::default()
        };
        HalSimServer::new(config, Arc::new(EventRegistry::new()))
    }

    #[tokio::test]
    async fn test_double_start_aborted_first_endpoint_survives() {
        let server = test_server();
        server.start().await.expect("first start");

        let err = server.start().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Aborted);

        // The first endpoint is still accepting.
        let addr = server.local_addr().expect("bound address");
        TcpStream::connect(addr).await.expect("still serving");

        server.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn test_shutdown_before_start_aborted() {
        let server = test_server();
        let err = server.shutdown().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Aborted);
    }

    #[tokio::test]
    async fn test_bind_failure_is_internal_and_recoverable() {
        let occupant = test_server();
        occupant.start().await.expect("start");
        let addr = occupant.local_addr().expect("bound address");

        let config = HalSimConfig {
            listen_addr: addr.to_string(),
            ..Default::default()
        };
        let contender = HalSimServer::new(config, Arc::new(EventRegistry::new()));

        let err = contender.start().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Internal);

        // The failed bind did not burn the one start: retrying reports the
        // bind conflict again rather than Aborted.
        let err = contender.start().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Internal);

        occupant.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn test_lifecycle_is_one_shot() {
        let server = test_server();
        server.start().await.expect("start");
        server.shutdown().await.expect("shutdown");

        // Once down, the instance cannot come back up.
        let err = server.start().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Aborted);

        // Repeating the shutdown is harmless.
        server.shutdown().await.expect("repeat shutdown");
    }

    #[tokio::test]
    async fn test_stalled_reader_disconnected_after_write_budget() {
        let (mut client, server_side) = tokio::io::duplex(64);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let service = HalSimService::new(Arc::new(EventRegistry::new()));
        let peer: SocketAddr = "127.0.0.1:0".parse().expect("peer addr");

        let conn = tokio::spawn(serve_connection(
            server_side,
            peer,
            service,
            shutdown_rx,
            Duration::from_secs(60),
            Duration::from_millis(100),
        ));

        // The error response overflows the transport buffer and nobody
        // drains it, so the write parks until its budget runs out.
        client.write_all(b"not json\n").await.expect("send request");

        // Stall the reader past the write budget before draining anything;
        // reading right away would free buffer space and let the send finish.
        tokio::time::sleep(Duration::from_millis(400)).await;

        let mut drained = Vec::new();
        timeout(Duration::from_secs(5), client.read_to_end(&mut drained))
            .await
            .expect("connection closes once the write budget is spent")
            .expect("read to eof");

        // The connection died mid-response.
        assert!(!drained.ends_with(b"\n"));

        conn.await.expect("serve task exits");
    }
}
