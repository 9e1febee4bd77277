//! # Tracks and Package Tiers
//!
//! Curriculum tracks decide which link rules apply and whether a submission
//! can be audited automatically. Package tiers decide between mentor review
//! and automated audit, and gate certificate eligibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of ordered milestones in every track.
pub const TOTAL_STAGES: u8 = 8;

/// Track name did not match any known track
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown track: {0}")]
pub struct UnknownTrack(pub String);

/// Tier name did not match any known package tier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown package tier: {0}")]
pub struct UnknownTier(pub String);

/// Curriculum discipline an application is enrolled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    #[serde(rename = "Frontend Development")]
    FrontendDevelopment,
    #[serde(rename = "Backend Development")]
    BackendDevelopment,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
    #[serde(rename = "Data Analysis")]
    DataAnalysis,
    #[serde(rename = "Project Management")]
    ProjectManagement,
    #[serde(rename = "Content Writing")]
    ContentWriting,
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
}

/// Which family of link rules a track uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Publicly deployed application or API
    Engineering,
    /// Design-tool file
    Design,
    /// Shared document
    Document,
}

/// How an automatable track is audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStyle {
    /// Structural markers in the fetched page
    Frontend,
    /// Response inspection plus protected-path and validation probes
    Backend,
}

impl Track {
    pub const ALL: [Track; 7] = [
        Track::FrontendDevelopment,
        Track::BackendDevelopment,
        Track::UiUxDesign,
        Track::DataAnalysis,
        Track::ProjectManagement,
        Track::ContentWriting,
        Track::DigitalMarketing,
    ];

    /// Display label, also used on certificates
    pub fn label(&self) -> &'static str {
        match self {
            Track::FrontendDevelopment => "Frontend Development",
            Track::BackendDevelopment => "Backend Development",
            Track::UiUxDesign => "UI/UX Design",
            Track::DataAnalysis => "Data Analysis",
            Track::ProjectManagement => "Project Management",
            Track::ContentWriting => "Content Writing",
            Track::DigitalMarketing => "Digital Marketing",
        }
    }

    pub fn link_class(&self) -> LinkClass {
        match self {
            Track::FrontendDevelopment | Track::BackendDevelopment => LinkClass::Engineering,
            Track::UiUxDesign => LinkClass::Design,
            Track::DataAnalysis
            | Track::ProjectManagement
            | Track::ContentWriting
            | Track::DigitalMarketing => LinkClass::Document,
        }
    }

    /// Audit style for tracks that can be checked automatically
    pub fn audit_style(&self) -> Option<AuditStyle> {
        match self {
            Track::FrontendDevelopment => Some(AuditStyle::Frontend),
            Track::BackendDevelopment => Some(AuditStyle::Backend),
            _ => None,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Track {
    type Err = UnknownTrack;

    /// Accepts the display label or a short slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let track = match normalized.as_str() {
            "frontend development" | "frontend" => Track::FrontendDevelopment,
            "backend development" | "backend" => Track::BackendDevelopment,
            "ui/ux design" | "uiux" | "ui-ux" | "design" => Track::UiUxDesign,
            "data analysis" | "data" => Track::DataAnalysis,
            "project management" | "pm" => Track::ProjectManagement,
            "content writing" | "content" => Track::ContentWriting,
            "digital marketing" | "marketing" => Track::DigitalMarketing,
            _ => return Err(UnknownTrack(s.to_string())),
        };
        Ok(track)
    }
}

/// Enrollment package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageTier {
    Free,
    Premium,
    PremiumPro,
}

impl PackageTier {
    /// Paid tiers receive mentor review and a verified certificate
    pub fn is_paid(&self) -> bool {
        !matches!(self, PackageTier::Free)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageTier::Free => "Free",
            PackageTier::Premium => "Premium",
            PackageTier::PremiumPro => "Premium Pro",
        }
    }
}

impl fmt::Display for PackageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PackageTier::Free),
            "premium" => Ok(PackageTier::Premium),
            "premium pro" | "premium_pro" | "premium-pro" => Ok(PackageTier::PremiumPro),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// Review path a submission takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "style")]
pub enum ReviewMode {
    /// Audited by the engine; the score decides the verdict
    Automated(AuditStyle),
    /// Queued for a reviewer who supplies the verdict out-of-band
    Manual,
}

/// Decide the review path for a track and tier.
///
/// Only free-tier enrollments on automatable tracks are audited by the
/// engine. Paid tiers get a mentor.
pub fn review_mode(track: Track, tier: PackageTier) -> ReviewMode {
    match track.audit_style() {
        Some(style) if !tier.is_paid() => ReviewMode::Automated(style),
        _ => ReviewMode::Manual,
    }
}
