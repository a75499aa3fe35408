use serde::Serialize;

use crate::{
    AppState,
    analytics::{
        Achievement, GoalProgress, GrowthIndicators, MetricSummary, RevenueSplit, TopFan,
        growth_indicators, revenue_split, summarize, top_fans, weekly_achievements,
    },
    error::AppError,
    providers::{DailyStats, or_empty},
    routes::account_fans,
    session::Session,
};

const TOP_FANS: usize = 3;

#[derive(Debug, Serialize)]
pub struct Goals {
    pub revenue: GoalProgress,
    pub subscribers: GoalProgress,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsMetrics {
    pub summary: MetricSummary,
    pub series: Vec<DailyStats>,
    pub revenue_split: RevenueSplit,
    pub growth: GrowthIndicators,
    pub goals: Goals,
    pub top_fans: Vec<TopFan>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsView {
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub metrics: Option<AnalyticsMetrics>,
}

impl AnalyticsView {
    pub async fn build(state: &AppState, session: &Session) -> Result<Self, AppError> {
        let Some(account) = session.current_account() else {
            return Ok(Self::empty(None, "You have no accounts available"));
        };

        let series = or_empty(state.providers.analytics.get_series(account).await)?;
        if series.is_empty() {
            return Ok(Self::empty(Some(account), "No analytics data to display yet"));
        }

        let summary = summarize(&series)?;
        let targets = session.goals();
        let goals = Goals {
            revenue: GoalProgress::new(summary.total_revenue, targets.target_revenue),
            subscribers: GoalProgress::new(summary.total_subs, targets.target_subs),
        };
        let fans = account_fans(state, session).await?;

        Ok(Self {
            account: Some(account.to_string()),
            notice: None,
            metrics: Some(AnalyticsMetrics {
                summary,
                revenue_split: revenue_split(&series),
                growth: growth_indicators(&summary),
                achievements: weekly_achievements(&goals.revenue, &goals.subscribers),
                top_fans: top_fans(&fans, TOP_FANS),
                goals,
                series,
            }),
        })
    }

    fn empty(account: Option<&str>, notice: &str) -> Self {
        Self {
            account: account.map(str::to_string),
            notice: Some(notice.to_string()),
            metrics: None,
        }
    }
}
