use crate::dns::transport::{DnsTransport, TransportError};
use rootwalk_domain::{
    Candidate, ExchangeError, FailedAttempt, Message, Query, ResolutionError, Stage,
    StageFailure, StageOutcome,
};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

/// The first well-formed, matching response of a stage.
#[derive(Debug)]
pub struct StageAnswer {
    pub responder: Candidate,
    pub message: Message,
    pub rtt: Duration,
    pub failures: Vec<FailedAttempt>,
}

enum Attempt {
    Answered(Message, Duration),
    Skipped(ExchangeError),
}

/// Sends one query to a stage's candidates strictly one at a time until a
/// candidate answers.
pub struct CandidateFailover<'a, T: ?Sized> {
    transport: &'a T,
    port: u16,
    timeout: Duration,
}

impl<'a, T> CandidateFailover<'a, T>
where
    T: DnsTransport + ?Sized,
{
    pub fn new(transport: &'a T, port: u16, timeout: Duration) -> Self {
        Self {
            transport,
            port,
            timeout,
        }
    }

    /// Runs `query` against `candidates` in order.
    ///
    /// Timeouts, undecodable replies and replies that do not match the query
    /// only skip the candidate. A local socket failure aborts immediately.
    pub async fn run(
        &self,
        stage: Stage,
        query: &Query,
        candidates: &[Candidate],
    ) -> Result<StageAnswer, ResolutionError> {
        debug!(
            stage = %stage,
            candidates = candidates.len(),
            id = query.id(),
            "Trying sequentially"
        );

        let mut failures = Vec::new();

        for (position, candidate) in candidates.iter().enumerate() {
            let server = SocketAddr::new(candidate.address, self.port);

            match self.attempt(query, server).await? {
                Attempt::Answered(message, rtt) => {
                    debug!(
                        stage = %stage,
                        server = %candidate,
                        rtt_ms = rtt.as_secs_f64() * 1000.0,
                        position = position,
                        "Server responded"
                    );
                    return Ok(StageAnswer {
                        responder: candidate.clone(),
                        message,
                        rtt,
                        failures,
                    });
                }
                Attempt::Skipped(error) => {
                    warn!(
                        stage = %stage,
                        server = %candidate,
                        error = %error,
                        position = position,
                        "Failing over"
                    );
                    failures.push(FailedAttempt {
                        candidate: candidate.clone(),
                        error,
                    });
                }
            }
        }

        let outcome = if failures
            .iter()
            .any(|f| matches!(f.error, ExchangeError::Malformed(_)))
        {
            StageOutcome::Malformed
        } else {
            StageOutcome::Exhausted
        };

        Err(ResolutionError::stage_failed(
            stage,
            StageFailure::Exhausted {
                outcome,
                attempts: failures,
            },
        ))
    }

    async fn attempt(&self, query: &Query, server: SocketAddr) -> Result<Attempt, ResolutionError> {
        let response = match self
            .transport
            .exchange(query.as_bytes(), server, self.timeout)
            .await
        {
            Ok(response) => response,
            Err(TransportError::Timeout) => return Ok(Attempt::Skipped(ExchangeError::Timeout)),
            Err(TransportError::Refused(reason)) => {
                return Ok(Attempt::Skipped(ExchangeError::Refused(reason)))
            }
            Err(TransportError::Unreachable(reason)) => {
                return Ok(Attempt::Skipped(ExchangeError::Unreachable(reason)))
            }
            Err(TransportError::Socket(reason)) => {
                return Err(ResolutionError::SocketError(reason))
            }
        };

        let message = match Message::decode(&response.bytes) {
            Ok(message) => message,
            Err(e) => return Ok(Attempt::Skipped(e.into())),
        };

        if let Err(e) = query.validate_response(&message) {
            return Ok(Attempt::Skipped(e));
        }

        if message.header.is_truncated() {
            debug!(server = %server, "Response has TC set; using it as received");
        }

        Ok(Attempt::Answered(message, response.rtt))
    }
}
