//! Enrollment statistics

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::program::{Application, Certificate};

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStats {
    pub total: usize,
    pub free: usize,
    pub paid: usize,
    pub completed: usize,
    pub certificates_issued: usize,
    /// Applications created in the last seven days
    pub new_this_week: usize,
}

impl EnrollmentStats {
    pub fn compute(applications: &[Application], certificates: &[Certificate]) -> Self {
        let week_ago = Utc::now() - Duration::days(7);
        let paid = applications.iter().filter(|a| a.tier.is_paid()).count();
        Self {
            total: applications.len(),
            free: applications.len() - paid,
            paid,
            completed: applications.iter().filter(|a| a.completed).count(),
            certificates_issued: certificates.len(),
            new_this_week: applications
                .iter()
                .filter(|a| a.created_at >= week_ago)
                .count(),
        }
    }
}
