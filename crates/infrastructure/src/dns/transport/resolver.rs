use qtype_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// Looks up every address of `hostname`, IPv4 entries first.
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|_| DomainError::UpstreamResolution {
            host: target.clone(),
        })?;

    let mut addrs: Vec<SocketAddr> = addrs_iter.collect();
    if addrs.is_empty() {
        return Err(DomainError::UpstreamResolution { host: target });
    }
    addrs.sort_by_key(|a| a.is_ipv6());

    Ok(addrs)
}
