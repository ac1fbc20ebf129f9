//! Line-delimited JSON over TCP. Each line in is one [`rpc::RpcRequest`],
//! each line out is the matching [`rpc::RpcResponse`], in order.

use std::{io, net::SocketAddr};

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use rpc::error::{ApiError, ApiErrorKind};
use rpc::RpcResponse;

use super::*;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Longest request line accepted, the connection is closed after anything longer
pub const MAX_LINE_LEN: usize = 64 * 1024;

pub fn add_rpc_server_task(state: &ServerState, runner: &TaskRunner) {
    runner.add(task_runner::fn_task(state.clone(), |mut alive, state| async move {
        while *alive.borrow_and_update() {
            if let Err(e) = RpcServer(state.clone()).run(alive.clone()).await {
                log::error!("RPC server error: {e}");

                tokio::select! {
                    biased;
                    _ = alive.changed() => break,
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }));
}

#[derive(Clone)]
struct RpcServer(ServerState);

impl RpcServer {
    async fn run(self, mut alive: Alive) -> Result<(), io::Error> {
        let RpcServer(state) = self;

        let bind_addr = state.config().rpc.bind;

        let listener = TcpListener::bind(bind_addr).await?;

        log::info!("RPC server listening on {bind_addr}");

        loop {
            let (stream, addr) = tokio::select! {
                biased;

                // server is shutting down
                _ = alive.changed() => break,

                // if config changed, end task so it'll be restarted with new config
                _ = state.config.config_change.notified() => {
                    if state.config().rpc.bind != bind_addr {
                        return Ok(());
                    }

                    continue;
                },

                res = listener.accept() => match res {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::warn!("Error accepting RPC connection: {e}");
                        continue;
                    }
                },
            };

            log::debug!("RPC connection from {addr}");

            tokio::spawn(serve_connection(state.clone(), stream, addr, alive.clone()));
        }

        Ok(())
    }
}

async fn serve_connection<S>(state: ServerState, stream: S, addr: SocketAddr, mut alive: Alive)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LEN));

    loop {
        let line = tokio::select! {
            biased;
            _ = alive.changed() => break,
            line = lines.next() => line,
        };

        let mut last = false;

        let response = match line {
            Some(Ok(line)) if line.trim().is_empty() => continue,
            Some(Ok(line)) => crate::rpc::handle_line(state.clone(), &line).await,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                log::debug!("RPC connection {addr} sent a line over {MAX_LINE_LEN} bytes");

                last = true;

                RpcResponse::Err(ApiError {
                    kind: ApiErrorKind::InvalidArgument,
                    message: format!("Request exceeds {MAX_LINE_LEN} bytes").into(),
                })
            }
            Some(Err(LinesCodecError::Io(e))) => {
                log::debug!("RPC connection {addr} read error: {e}");
                break;
            }
            None => break,
        };

        let mut out = match serde_json::to_vec(&response) {
            Ok(out) => out,
            Err(e) => {
                log::error!("Error encoding RPC response: {e}");
                break;
            }
        };

        out.push(b'\n');

        if let Err(e) = writer.write_all(&out).await {
            log::debug!("RPC connection {addr} write error: {e}");
            break;
        }

        if last {
            break;
        }
    }

    log::debug!("RPC connection {addr} closed");
}
