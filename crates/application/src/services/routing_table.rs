use qtype_dns_domain::{ConfigError, ForwardingConfig, RecordType, UpstreamAddr};
use std::collections::HashMap;
use tracing::info;

/// Ordered, non-empty list of upstreams configured for one route.
#[derive(Debug, Clone)]
pub struct ServerList {
    primary: UpstreamAddr,
    others: Vec<UpstreamAddr>,
}

impl ServerList {
    pub fn new(servers: Vec<UpstreamAddr>) -> Option<Self> {
        let mut iter = servers.into_iter();
        let primary = iter.next()?;
        Some(Self {
            primary,
            others: iter.collect(),
        })
    }

    /// First-server-wins: the first configured address answers every query on
    /// this route and the others are never contacted.
    pub fn select_primary(&self) -> &UpstreamAddr {
        &self.primary
    }

    pub fn len(&self) -> usize {
        1 + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpstreamAddr> {
        std::iter::once(&self.primary).chain(self.others.iter())
    }
}

/// Query type → upstream routes, plus the catch-all used for every other type.
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    overrides: HashMap<u16, ServerList>,
    catch_all: ServerList,
}

impl RoutingTable {
    pub fn new(
        overrides: Vec<(RecordType, Vec<UpstreamAddr>)>,
        catch_all: Vec<UpstreamAddr>,
    ) -> Result<Self, ConfigError> {
        let catch_all = ServerList::new(catch_all).ok_or_else(|| {
            ConfigError::Validation("No default upstream servers configured".to_string())
        })?;

        let mut routes = HashMap::with_capacity(overrides.len());
        for (record_type, servers) in overrides {
            let list = ServerList::new(servers).ok_or_else(|| {
                ConfigError::Validation(format!("Override for {} has no servers", record_type))
            })?;
            routes.insert(record_type.to_u16(), list);
        }

        Ok(Self {
            overrides: routes,
            catch_all,
        })
    }

    pub fn from_config(config: &ForwardingConfig) -> Result<Self, ConfigError> {
        let catch_all = config.parsed_servers()?;
        let overrides = config.parsed_overrides()?;

        let defaults: Vec<String> = catch_all.iter().map(ToString::to_string).collect();
        if overrides.is_empty() {
            info!(servers = ?defaults, "No qtype overrides, all queries go to the default servers");
        } else {
            info!(servers = ?defaults, "Default upstream servers");
            for (record_type, servers) in &overrides {
                let servers: Vec<String> = servers.iter().map(ToString::to_string).collect();
                info!(qtype = %record_type, servers = ?servers, "Upstream override");
            }
        }

        Self::new(overrides, catch_all)
    }

    /// Upstream for a query type, compared by numeric code so types this
    /// crate has no name for still fall through to the catch-all.
    pub fn select(&self, qtype: u16) -> &UpstreamAddr {
        self.overrides
            .get(&qtype)
            .unwrap_or(&self.catch_all)
            .select_primary()
    }

    pub fn select_for(&self, record_type: RecordType) -> &UpstreamAddr {
        self.select(record_type.to_u16())
    }

    pub fn has_override(&self, qtype: u16) -> bool {
        self.overrides.contains_key(&qtype)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn catch_all(&self) -> &ServerList {
        &self.catch_all
    }
}
