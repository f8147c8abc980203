//! Report rendering: a per-stage text dump for humans and a JSON document
//! for scripts.

use rootwalk_domain::{FailedAttempt, Resolution, ResolutionError, StageReport};
use rootwalk_infrastructure::http::HttpFetch;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResponse {
    pub hostname: String,
    pub record_type: String,
    pub elapsed_ms: f64,
    pub answers: Vec<AnswerResponse>,
    pub stages: Vec<StageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch: Option<FetchResponse>,
}

impl ResolutionResponse {
    pub fn from_resolution(r: &Resolution, fetch: Option<&HttpFetch>) -> Self {
        Self {
            hostname: r.hostname.clone(),
            record_type: r.record_type.to_string(),
            elapsed_ms: millis(r.elapsed),
            answers: r
                .answers
                .iter()
                .map(|a| AnswerResponse {
                    name: a.name.clone(),
                    record_type: a.record_type.to_string(),
                    ttl: a.ttl,
                    address: a.address.to_string(),
                })
                .collect(),
            stages: r.trail.iter().map(StageResponse::from_report).collect(),
            fetch: fetch.map(FetchResponse::from_fetch),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameserverResponse {
    pub zone: String,
    pub nameserver: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedResponse {
    pub server: String,
    pub address: String,
    pub error: String,
}

impl SkippedResponse {
    fn from_attempt(a: &FailedAttempt) -> Self {
        Self {
            server: a.candidate.name.clone(),
            address: a.candidate.address.to_string(),
            error: a.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageResponse {
    pub stage: String,
    pub server: String,
    pub address: String,
    pub rtt_ms: f64,
    pub id: u16,
    pub rcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
    pub nameservers: Vec<NameserverResponse>,
    pub glue: Vec<String>,
    pub ipv6_glue: Vec<String>,
    pub skipped: Vec<SkippedResponse>,
}

impl StageResponse {
    pub fn from_report(r: &StageReport) -> Self {
        Self {
            stage: r.stage.to_string(),
            server: r.responder.name.clone(),
            address: r.responder.address.to_string(),
            rtt_ms: millis(r.rtt),
            id: r.header.id,
            rcode: r.header.rcode(),
            authoritative: r.header.is_authoritative(),
            truncated: r.header.is_truncated(),
            answer_count: r.header.an_count,
            authority_count: r.header.ns_count,
            additional_count: r.header.ar_count,
            nameservers: r
                .referral
                .nameservers
                .iter()
                .map(|(zone, ns)| NameserverResponse {
                    zone: zone.clone(),
                    nameserver: ns.clone(),
                })
                .collect(),
            glue: r.referral.glue.iter().map(|c| c.to_string()).collect(),
            ipv6_glue: r.referral.ipv6_glue.iter().map(|c| c.to_string()).collect(),
            skipped: r.failures.iter().map(SkippedResponse::from_attempt).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub address: String,
    pub host: String,
    pub status_line: String,
    pub rtt_ms: f64,
    pub body_bytes: usize,
}

impl FetchResponse {
    pub fn from_fetch(f: &HttpFetch) -> Self {
        Self {
            address: f.address.to_string(),
            host: f.host.clone(),
            status_line: f.status_line.clone(),
            rtt_ms: millis(f.rtt),
            body_bytes: f.body.len(),
        }
    }
}

pub fn write_report<W: Write>(out: &mut W, resolution: &Resolution) -> io::Result<()> {
    for report in &resolution.trail {
        write_stage(out, report)?;
    }

    writeln!(out, ";; ANSWER for {}:", resolution.hostname)?;
    for answer in &resolution.answers {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            answer.name, answer.ttl, answer.record_type, answer.address
        )?;
    }
    writeln!(
        out,
        ";; resolved in {:.1} ms (authoritative rtt {:.1} ms)",
        millis(resolution.elapsed),
        millis(resolution.rtt)
    )
}

fn write_stage<W: Write>(out: &mut W, report: &StageReport) -> io::Result<()> {
    let header = &report.header;
    writeln!(
        out,
        ";; {} stage: {} in {:.1} ms",
        report.stage,
        report.responder,
        millis(report.rtt)
    )?;
    writeln!(
        out,
        ";;   id {:#06x} rcode {} aa {} tc {} | qd {} an {} ns {} ar {}",
        header.id,
        header.rcode(),
        header.is_authoritative(),
        header.is_truncated(),
        header.qd_count,
        header.an_count,
        header.ns_count,
        header.ar_count
    )?;
    for attempt in &report.failures {
        write_attempt(out, attempt)?;
    }
    for (zone, ns) in &report.referral.nameservers {
        writeln!(out, ";;   NS {} -> {}", zone, ns)?;
    }
    for glue in &report.referral.glue {
        writeln!(out, ";;   glue {}", glue)?;
    }
    for glue in &report.referral.ipv6_glue {
        writeln!(out, ";;   glue (not queried) {}", glue)?;
    }
    Ok(())
}

fn write_attempt<W: Write>(out: &mut W, attempt: &FailedAttempt) -> io::Result<()> {
    writeln!(out, ";;   skipped {}: {}", attempt.candidate, attempt.error)
}

/// The error followed by every candidate a failed stage went through.
pub fn failure_message(err: &ResolutionError) -> String {
    let mut message = err.to_string();
    let attempts = match err {
        ResolutionError::NoRootResponse(f)
        | ResolutionError::NoTldResponse(f)
        | ResolutionError::NoAuthoritativeResponse(f) => f.attempts(),
        _ => &[],
    };
    for attempt in attempts {
        message.push_str(&format!(
            "\n;;   skipped {}: {}",
            attempt.candidate, attempt.error
        ));
    }
    message
}

pub fn write_fetch<W: Write>(out: &mut W, fetch: &HttpFetch) -> io::Result<()> {
    writeln!(
        out,
        ";; HTTP {} from {} in {:.1} ms, {} body bytes",
        fetch.status_line,
        fetch.address,
        millis(fetch.rtt),
        fetch.body.len()
    )
}
