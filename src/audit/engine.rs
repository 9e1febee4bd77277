//! Audit engine

use async_trait::async_trait;
use tracing::{debug, info};

use crate::program::{review_mode, AuditStyle, PackageTier, ReviewMode, Track, TOTAL_STAGES};

use super::backend;
use super::config::AuditConfig;
use super::errors::AuditResult;
use super::frontend;
use super::probe::Prober;
use super::report::{AuditReport, Finding};
use super::target::normalize;

/// What to audit
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub link: String,
    pub track: Track,
    pub stage: u8,
    pub tier: PackageTier,
}

/// Produces an audit report for a submission
///
/// Implementations never fail: unreachable targets yield a zero-score report.
#[async_trait]
pub trait ProjectAuditor: Send + Sync {
    async fn audit(&self, request: &AuditRequest) -> AuditReport;
}

/// Network-backed auditor
pub struct AuditEngine {
    prober: Prober,
}

impl AuditEngine {
    pub fn new(config: &AuditConfig) -> AuditResult<Self> {
        Ok(Self {
            prober: Prober::new(config)?,
        })
    }

    async fn run(&self, style: AuditStyle, link: &str, stage: u8) -> Finding {
        let url = match normalize(link) {
            Ok(url) => url,
            Err(e) => {
                debug!(link, error = %e, "audit target rejected");
                return Finding::new(
                    0,
                    "We could not read that link as a web address. Check it and resubmit.",
                );
            }
        };

        let page = match self.prober.fetch(&url).await {
            Ok(page) => page,
            Err(failure) => {
                info!(url = %url, ?failure, "audit probe failed");
                return Finding::new(0, failure.remediation());
            }
        };

        match style {
            AuditStyle::Frontend => frontend::score(stage, &page),
            AuditStyle::Backend if page.status == 404 => Finding::new(
                0,
                "Your API root returned 404 Not Found. Deploy the API and make sure the base URL responds.",
            ),
            AuditStyle::Backend => backend::score(stage, &url, &page, &self.prober).await,
        }
    }
}

#[async_trait]
impl ProjectAuditor for AuditEngine {
    async fn audit(&self, request: &AuditRequest) -> AuditReport {
        let stage = request.stage.clamp(1, TOTAL_STAGES);
        let style = match review_mode(request.track, request.tier) {
            ReviewMode::Manual => return AuditReport::manual(stage),
            ReviewMode::Automated(style) => style,
        };

        let finding = self.run(style, &request.link, stage).await;
        debug!(
            track = %request.track,
            stage,
            score = finding.score,
            "audit finished"
        );
        AuditReport::automated(style, stage, finding)
    }
}
