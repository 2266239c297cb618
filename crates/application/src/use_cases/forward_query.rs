use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::ports::{QueryHandler, UpstreamExchange};
use crate::services::{reply_to, single_question, RoutingTable};

/// Relays each question of a request to the upstream picked by its query
/// type and folds the results into one reply.
///
/// Questions are exchanged one at a time, in request order. The first
/// failure ends the request: a transport error becomes SERVFAIL, an upstream
/// error rcode is passed through unchanged, and answers gathered from earlier
/// questions are dropped.
pub struct ForwardQueryUseCase {
    routes: Arc<RoutingTable>,
    upstream: Arc<dyn UpstreamExchange>,
}

impl ForwardQueryUseCase {
    pub fn new(routes: Arc<RoutingTable>, upstream: Arc<dyn UpstreamExchange>) -> Self {
        Self { routes, upstream }
    }

    pub async fn execute(&self, request: &Message) -> Message {
        let mut answers: Vec<Record> = Vec::new();
        let mut failure: Option<ResponseCode> = None;

        // TODO: batch questions that share a query type into one sub-request,
        // and exchange independent batches concurrently.
        for query in request.queries() {
            let sub_request = single_question(request, query);
            let server = self.routes.select(u16::from(query.query_type()));

            match self.upstream.exchange(&sub_request, server).await {
                Err(e) => {
                    // An unreachable upstream is routine; an unusable reply is not.
                    if e.is_transport() {
                        warn!(
                            id = request.id(),
                            domain = %query.name(),
                            qtype = %query.query_type(),
                            server = %server,
                            error = %e,
                            "Upstream exchange failed"
                        );
                    } else {
                        error!(
                            id = request.id(),
                            domain = %query.name(),
                            qtype = %query.query_type(),
                            server = %server,
                            error = %e,
                            "Upstream reply unusable"
                        );
                    }
                    failure = Some(ResponseCode::ServFail);
                    break;
                }
                Ok(upstream_reply) if upstream_reply.response_code() != ResponseCode::NoError => {
                    warn!(
                        id = request.id(),
                        domain = %query.name(),
                        qtype = %query.query_type(),
                        server = %server,
                        rcode = %upstream_reply.response_code(),
                        "Upstream query did not succeed"
                    );
                    failure = Some(upstream_reply.response_code());
                    break;
                }
                Ok(mut upstream_reply) => {
                    let sub_answers = upstream_reply.take_answers();
                    debug!(
                        id = request.id(),
                        domain = %query.name(),
                        qtype = %query.query_type(),
                        server = %server,
                        answers = sub_answers.len(),
                        "Upstream answered"
                    );
                    answers.extend(sub_answers);
                }
            }
        }

        let mut reply = reply_to(request);
        match failure {
            Some(code) => {
                reply.set_response_code(code);
            }
            None => {
                reply.add_answers(answers);
                reply.set_authoritative(false);
            }
        }

        debug!(
            id = reply.id(),
            rcode = %reply.response_code(),
            questions = reply.queries().len(),
            answers = reply.answers().len(),
            "Responding"
        );
        reply
    }
}

#[async_trait]
impl QueryHandler for ForwardQueryUseCase {
    async fn handle(&self, request: &Message) -> Message {
        self.execute(request).await
    }

    fn mode(&self) -> &'static str {
        "forward"
    }
}
