use super::failover::{CandidateFailover, StageAnswer};
use super::ids::{IdSource, RandomIds};
use crate::dns::transport::{DnsTransport, UdpTransport};
use rootwalk_domain::wire::CLASS_IN;
use rootwalk_domain::{
    Query, Referral, Resolution, ResolutionError, ResolvedAddress, ResolverConfig, Stage,
    StageFailure, StageReport,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Walks the delegation chain root -> TLD -> authoritative by hand.
///
/// Each [`resolve`](Self::resolve) call owns one UDP socket for its whole
/// lifetime; no state is shared between calls.
pub struct IterativeResolver {
    config: ResolverConfig,
    ids: Arc<dyn IdSource>,
}

impl IterativeResolver {
    pub fn new(config: ResolverConfig) -> Self {
        info!(
            timeout_ms = config.query_timeout_ms,
            deadline_ms = ?config.deadline_ms,
            roots = config.root_servers.len(),
            "Iterative resolver created"
        );

        Self {
            config,
            ids: Arc::new(RandomIds),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `hostname` over a fresh UDP socket.
    pub async fn resolve(&self, hostname: &str) -> Result<Resolution, ResolutionError> {
        // Reject bad names before touching the network.
        self.build_query(hostname)?;

        let transport = UdpTransport::bind()
            .await
            .map_err(|e| ResolutionError::SocketError(e.to_string()))?;

        self.resolve_with(&transport, hostname).await
    }

    /// Resolves `hostname` over a caller-supplied transport.
    pub async fn resolve_with<T>(
        &self,
        transport: &T,
        hostname: &str,
    ) -> Result<Resolution, ResolutionError>
    where
        T: DnsTransport + ?Sized,
    {
        let started = Instant::now();
        let deadline = self
            .config
            .deadline()
            .map(|limit| tokio::time::Instant::from_std(started + limit));
        let failover =
            CandidateFailover::new(transport, self.config.port, self.config.query_timeout());

        let mut stage = Stage::Root;
        let mut candidates = self.config.root_servers.clone();
        let mut trail: Vec<StageReport> = Vec::with_capacity(Stage::ALL.len());

        loop {
            let query = self.build_query(hostname)?;
            let stage_run = failover.run(stage, &query, &candidates);

            let answer = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, stage_run)
                    .await
                    .map_err(|_| ResolutionError::DeadlineExceeded {
                        stage,
                        elapsed: started.elapsed(),
                    })??,
                None => stage_run.await?,
            };

            let report = Self::report(stage, answer);

            info!(
                stage = %stage,
                server = %report.responder,
                rtt_ms = report.rtt.as_secs_f64() * 1000.0,
                rcode = report.header.rcode(),
                answers = report.message.answers.len(),
                nameservers = report.referral.nameservers.len(),
                glue = report.referral.glue.len(),
                skipped = report.failures.len(),
                "Stage answered"
            );

            match stage.next() {
                Some(next) => {
                    if report.referral.is_empty() {
                        return Err(ResolutionError::stage_failed(
                            stage,
                            StageFailure::NoReferral {
                                server: report.responder,
                            },
                        ));
                    }
                    candidates = report.referral.glue.clone();
                    trail.push(report);
                    stage = next;
                }
                None => return self.finish(hostname, report, trail, started),
            }
        }
    }

    fn build_query(&self, hostname: &str) -> Result<Query, ResolutionError> {
        Query::new(
            self.ids.next_id(),
            hostname,
            self.config.record_type.to_u16(),
            CLASS_IN,
        )
        .map_err(ResolutionError::InvalidHostname)
    }

    fn report(stage: Stage, answer: StageAnswer) -> StageReport {
        StageReport {
            stage,
            responder: answer.responder,
            rtt: answer.rtt,
            header: answer.message.header,
            referral: Referral::from_message(&answer.message),
            failures: answer.failures,
            message: answer.message,
        }
    }

    fn finish(
        &self,
        hostname: &str,
        report: StageReport,
        mut trail: Vec<StageReport>,
        started: Instant,
    ) -> Result<Resolution, ResolutionError> {
        let wanted = self.config.record_type.to_u16();
        let answers: Vec<ResolvedAddress> = report
            .message
            .address_answers()
            .filter(|rr| rr.rtype == wanted)
            .filter_map(ResolvedAddress::from_record)
            .collect();

        if answers.is_empty() {
            return Err(ResolutionError::EmptyAnswer {
                server: report.responder,
                rcode: report.header.rcode(),
            });
        }

        let rtt = report.rtt;
        trail.push(report);

        let elapsed = started.elapsed();
        debug!(
            hostname = %hostname,
            addresses = answers.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Resolution complete"
        );

        Ok(Resolution {
            hostname: hostname.strip_suffix('.').unwrap_or(hostname).to_string(),
            record_type: self.config.record_type,
            answers,
            rtt,
            trail,
            elapsed,
        })
    }
}
