use qtype_dns_application::ports::QueryHandler;
use qtype_dns_application::services::RoutingTable;
use qtype_dns_application::use_cases::{ForwardQueryUseCase, StaticAnswerUseCase};
use qtype_dns_domain::{Config, ServerMode};
use qtype_dns_infrastructure::dns::{
    DnsServerHandler, InMemoryRecordStore, TransportExchange, ZoneGate,
};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub handler: Arc<DnsServerHandler>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let query_handler: Arc<dyn QueryHandler> = match config.mode {
            ServerMode::Forward => {
                let routes = Arc::new(RoutingTable::from_config(&config.forwarding)?);
                let exchange = Arc::new(TransportExchange::from_config(&config.upstream));
                info!(
                    protocol = config.upstream.protocol.as_str(),
                    timeout_ms = config.upstream.query_timeout,
                    "Upstream exchange ready"
                );
                Arc::new(ForwardQueryUseCase::new(routes, exchange))
            }
            ServerMode::Static => {
                let store = Arc::new(InMemoryRecordStore::new());
                Arc::new(StaticAnswerUseCase::from_config(store, &config.records)?)
            }
        };

        let gate = ZoneGate::new(&config.server.domain);
        info!(
            mode = query_handler.mode(),
            zone = gate.zone(),
            "Query handler ready"
        );

        Ok(Self {
            handler: Arc::new(DnsServerHandler::new(query_handler, gate)),
        })
    }
}
