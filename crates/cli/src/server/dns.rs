use qtype_dns_application::services::SERVER_UDP_PAYLOAD;
use qtype_dns_infrastructure::dns::server::DnsServerHandler;
use qtype_dns_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const MAX_UDP_MESSAGE_SIZE: usize = SERVER_UDP_PAYLOAD as usize;

/// Binds UDP and TCP on `bind_addr` and serves until `shutdown` is
/// cancelled. Bind failures are returned before any request is served.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: Arc<DnsServerHandler>,
    tcp_idle_timeout: Duration,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let (udp_socket, tcp_listener) = match bind_listeners(bind_addr) {
        Ok(listeners) => listeners,
        Err(e) if bind_addr.ip() == IpAddr::V6(Ipv6Addr::UNSPECIFIED) => {
            let fallback = SocketAddr::from((Ipv4Addr::UNSPECIFIED, bind_addr.port()));
            warn!(error = %e, fallback = %fallback, "Dual-stack bind failed, listening on IPv4 only");
            bind_listeners(fallback)?
        }
        Err(e) => return Err(e),
    };
    let udp_socket = Arc::new(udp_socket);
    let local_addr = udp_socket.local_addr()?;

    info!(
        bind_address = %local_addr,
        zone = handler.zone(),
        mode = handler.mode(),
        "DNS server ready"
    );

    let mut join_set: JoinSet<()> = JoinSet::new();
    join_set.spawn(run_udp_listener(
        udp_socket,
        handler.clone(),
        shutdown.clone(),
    ));
    join_set.spawn(run_tcp_listener(
        tcp_listener,
        handler,
        tcp_idle_timeout,
        shutdown,
    ));

    while join_set.join_next().await.is_some() {}
    info!("DNS listeners stopped");
    Ok(())
}

async fn run_udp_listener(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) {
    let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, client) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(r) => r,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // ICMP errors from earlier sends surface here on some
                    // platforms; the socket is still usable.
                    debug!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let owned_buf: Arc<[u8]> = Arc::from(&recv_buf[..len]);
        let handler = handler.clone();
        let socket = socket.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle_bytes(&owned_buf, client).await {
                if let Err(e) = socket.send_to(&response, client).await {
                    error!(client = %client, error = %e, "Failed to send UDP reply");
                }
            }
        });
    }
}

async fn run_tcp_listener(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, client) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(a) => a,
                Err(e) => {
                    error!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = serve_tcp_connection(stream, client, handler, idle_timeout) => {}
            }
        });
    }
}

/// Answers length-prefixed requests on one connection, in order, until the
/// peer closes it or stays idle past `idle_timeout`.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    client: SocketAddr,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
) {
    loop {
        let request = match tokio::time::timeout(idle_timeout, read_with_length_prefix(&mut stream))
            .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Ok(Err(e)) => {
                debug!(client = %client, error = %e, "TCP read error");
                break;
            }
            Err(_) => {
                debug!(client = %client, "Closing idle TCP connection");
                break;
            }
        };

        let Some(response) = handler.handle_bytes(&request, client).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            error!(client = %client, error = %e, "Failed to send TCP reply");
            break;
        }
    }
}

fn bind_listeners(bind_addr: SocketAddr) -> anyhow::Result<(UdpSocket, TcpListener)> {
    let domain = if bind_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    Ok((
        create_udp_socket(domain, bind_addr)?,
        create_tcp_listener(domain, bind_addr)?,
    ))
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
