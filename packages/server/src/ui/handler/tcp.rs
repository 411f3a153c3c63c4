//! TCP line transport shim.
//!
//! Inbound bytes are split on `\n` (a trailing `\r` is dropped) and each
//! line is one chat message. Outbound frames are written verbatim.
//!
//! A line longer than [`MAX_LINE_LEN`] bytes is a transport error and closes
//! the connection.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};

use crate::{
    domain::{ConnectionHandle, ConnectionId, OutboundFrame},
    usecase::{ConnectionLifecycle, LifecycleCoordinator},
};

/// Longest accepted line body in bytes, terminator excluded
pub const MAX_LINE_LEN: usize = 8192;

/// Accept line-protocol connections until `shutdown` resolves.
///
/// Every accepted connection gets its own worker task.
pub async fn serve_lines<F>(
    listener: TcpListener,
    coordinator: Arc<LifecycleCoordinator>,
    shutdown: F,
) where
    F: Future<Output = ()> + Send,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, remote_addr)) => {
                    tokio::spawn(handle_connection(stream, remote_addr, coordinator.clone()));
                }
                Err(e) => {
                    tracing::warn!("Failed to accept line connection: {}", e);
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Line listener stopped");
                break;
            }
        }
    }
}

/// Spawns a task that drains the connection's outbound queue into the socket.
fn writer_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut writer: OwnedWriteHalf,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if let Err(e) = writer.write_all(text.as_bytes()).await {
                        tracing::debug!("Line write failed: {}", e);
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let _ = writer.shutdown().await;
                    break;
                }
            }
        }
    })
}

/// Read one line with its `\n` or `\r\n` terminator stripped.
///
/// Returns `Ok(None)` at EOF. At most `max_len + 2` bytes are buffered
/// per call; a longer line fails with [`io::ErrorKind::InvalidData`], as
/// does a line that is not valid UTF-8.
async fn next_line<R>(reader: &mut R, max_len: usize) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = (&mut *reader)
        .take(max_len as u64 + 2)
        .read_line(&mut line)
        .await?;
    if read == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    if line.len() > max_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {} bytes", max_len),
        ));
    }

    Ok(Some(line))
}

/// Feeds inbound lines to the coordinator until EOF or a read error.
async fn read_lines(
    coordinator: &LifecycleCoordinator,
    lifecycle: &ConnectionLifecycle,
    reader: OwnedReadHalf,
) {
    let mut reader = BufReader::new(reader);

    loop {
        match next_line(&mut reader, MAX_LINE_LEN).await {
            Ok(Some(line)) => {
                coordinator.on_message(lifecycle, &line).await;
            }
            Ok(None) => {
                tracing::info!("Connection '{}' closed by peer", lifecycle.handle().id());
                break;
            }
            Err(e) => {
                coordinator.on_transport_error(lifecycle, &e);
                break;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    coordinator: Arc<LifecycleCoordinator>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::warn!("Failed to set TCP_NODELAY for {}: {}", remote_addr, e);
    }
    let (reader, writer) = stream.into_split();

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(ConnectionId::generate(), remote_addr, tx);
    let mut lifecycle = ConnectionLifecycle::new(handle);
    tracing::info!(
        "Line connection '{}' accepted from {}",
        lifecycle.handle().id(),
        remote_addr
    );

    let mut send_task = writer_loop(rx, writer);
    coordinator.on_connect(&mut lifecycle).await;

    tokio::select! {
        _ = read_lines(&coordinator, &lifecycle, reader) => send_task.abort(),
        _ = &mut send_task => {},
    };

    coordinator.on_disconnect(&mut lifecycle).await;
}
