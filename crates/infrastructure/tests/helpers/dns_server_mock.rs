#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use qtype_dns_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock upstream answers each request.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// One A record with this address per question.
    Answer(Ipv4Addr),
    /// This many A records for the first question, regardless of the
    /// payload size the client advertised.
    Flood(Ipv4Addr, u16),
    /// No records, this response code.
    Rcode(ResponseCode),
    /// Never reply.
    Silent,
    /// Reply with the id flipped.
    WrongId,
}

/// Loopback upstream resolver listening on UDP or TCP.
pub struct MockDnsServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start_udp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = build_response(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn start_tcp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let counter = counter.clone();
                        tokio::spawn(async move {
                            while let Ok(query) = read_with_length_prefix(&mut stream).await {
                                counter.fetch_add(1, Ordering::SeqCst);
                                match build_response(&query, behavior) {
                                    Some(response) => {
                                        if send_with_length_prefix(&mut stream, &response).await.is_err() {
                                            break;
                                        }
                                    }
                                    None => {
                                        // Hold the connection open without answering.
                                        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                                        break;
                                    }
                                }
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(query_bytes: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
    let query = Message::from_vec(query_bytes).ok()?;

    let mut response = Message::new();
    response
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(query.op_code())
        .set_recursion_desired(query.recursion_desired())
        .set_recursion_available(true);
    response.add_queries(query.queries().to_vec());

    match behavior {
        MockBehavior::Answer(ip) => {
            for q in query.queries() {
                response.add_answer(Record::from_rdata(q.name().clone(), 60, RData::A(A(ip))));
            }
        }
        MockBehavior::Flood(base, count) => {
            let name = query.queries().first()?.name().clone();
            let base = u32::from(base);
            for i in 0..u32::from(count) {
                let ip = Ipv4Addr::from(base.wrapping_add(i));
                response.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A(ip))));
            }
        }
        MockBehavior::Rcode(code) => {
            response.set_response_code(code);
        }
        MockBehavior::Silent => return None,
        MockBehavior::WrongId => {
            response.set_id(query.id() ^ 0xFFFF);
        }
    }

    response.to_vec().ok()
}
