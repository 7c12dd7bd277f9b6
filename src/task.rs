//! Task identifiers: the closed set of analysis modes a user can pick.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    GenerateSalesPitch,
    AnalyzeProspects,
    KpiDashboard,
    CampaignAutomation,
    ChurnMonitoring,
    RouteOptimization,
    DirectMailOptimization,
    MarketingCollateral,
}

impl TaskId {
    /// Menu order.
    pub const ALL: [TaskId; 8] = [
        TaskId::GenerateSalesPitch,
        TaskId::AnalyzeProspects,
        TaskId::KpiDashboard,
        TaskId::CampaignAutomation,
        TaskId::ChurnMonitoring,
        TaskId::RouteOptimization,
        TaskId::DirectMailOptimization,
        TaskId::MarketingCollateral,
    ];

    /// Stable identifier.
    pub fn key(self) -> &'static str {
        match self {
            TaskId::GenerateSalesPitch => "GenerateSalesPitch",
            TaskId::AnalyzeProspects => "AnalyzeProspects",
            TaskId::KpiDashboard => "KPIDashboard",
            TaskId::CampaignAutomation => "CampaignAutomation",
            TaskId::ChurnMonitoring => "ChurnMonitoring",
            TaskId::RouteOptimization => "RouteOptimization",
            TaskId::DirectMailOptimization => "DirectMailOptimization",
            TaskId::MarketingCollateral => "MarketingCollateral",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            TaskId::GenerateSalesPitch => "Generate Sales Pitch",
            TaskId::AnalyzeProspects => "Analyze Prospects",
            TaskId::KpiDashboard => "KPI Dashboard",
            TaskId::CampaignAutomation => "Campaign Automation",
            TaskId::ChurnMonitoring => "Churn/Upgrade Monitoring",
            TaskId::RouteOptimization => "Route Build Optimization",
            TaskId::DirectMailOptimization => "Direct Mail Optimization",
            TaskId::MarketingCollateral => "Marketing Collateral",
        }
    }

    /// Whether the task has a handler, as opposed to the guidance fallback.
    pub fn is_implemented(self) -> bool {
        matches!(self, TaskId::KpiDashboard | TaskId::CampaignAutomation)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    /// Accepts the key or the menu label, ignoring case, spaces, `-`, `_`
    /// and `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn squash(s: &str) -> String {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_' | '/'))
                .flat_map(char::to_lowercase)
                .collect()
        }
        let wanted = squash(s);
        TaskId::ALL
            .into_iter()
            .find(|t| squash(t.key()) == wanted || squash(t.label()) == wanted)
            .ok_or_else(|| AppError::InvalidParameters(format!("unknown task: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("KPIDashboard".parse::<TaskId>().unwrap(), TaskId::KpiDashboard);
        assert_eq!("kpi-dashboard".parse::<TaskId>().unwrap(), TaskId::KpiDashboard);
        assert_eq!("Churn/Upgrade Monitoring".parse::<TaskId>().unwrap(), TaskId::ChurnMonitoring);
        assert_eq!("campaign_automation".parse::<TaskId>().unwrap(), TaskId::CampaignAutomation);
        assert!("forecast".parse::<TaskId>().is_err());
    }

    #[test]
    fn keys_round_trip() {
        for t in TaskId::ALL {
            assert_eq!(t.key().parse::<TaskId>().unwrap(), t);
        }
    }

    #[test]
    fn only_two_tasks_implemented() {
        let implemented: Vec<TaskId> = TaskId::ALL.into_iter().filter(|t| t.is_implemented()).collect();
        assert_eq!(implemented, vec![TaskId::KpiDashboard, TaskId::CampaignAutomation]);
    }
}
