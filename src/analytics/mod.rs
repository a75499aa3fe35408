//! Pure metrics over a daily series: totals, deltas, goals and achievements.

use serde::Serialize;

use crate::error::DataError;
use crate::providers::{DailyStats, Fan};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub total_revenue: u64,
    pub revenue_delta: i64,
    pub total_subs: u64,
    pub subs_delta: i64,
    pub avg_watch: f64,
}

/// Totals for the metric cards. Each delta is the displayed value minus the
/// second-to-last day's value, or zero with fewer than two days.
pub fn summarize(series: &[DailyStats]) -> Result<MetricSummary, DataError> {
    let last = series.last().ok_or(DataError::EmptyDataset)?;

    let total_revenue: u64 = series.iter().map(|d| d.revenue).sum();
    let total_subs = last.subs;
    let avg_watch = series.iter().map(|d| d.avg_watch).sum::<f64>() / series.len() as f64;

    let (revenue_delta, subs_delta) = match series.len().checked_sub(2).map(|i| &series[i]) {
        Some(prev) => (
            total_revenue as i64 - prev.revenue as i64,
            total_subs as i64 - prev.subs as i64,
        ),
        None => (0, 0),
    };

    Ok(MetricSummary {
        total_revenue,
        revenue_delta,
        total_subs,
        subs_delta,
        avg_watch,
    })
}

/// Share of a goal reached, capped at 1.0. A zero target counts as no progress.
pub fn goal_progress(actual: u64, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (actual as f64 / target as f64).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub target: u64,
    pub actual: u64,
    pub progress: f64,
    pub remaining: u64,
}

impl GoalProgress {
    pub fn new(actual: u64, target: u64) -> Self {
        Self {
            target,
            actual,
            progress: goal_progress(actual, target),
            remaining: target.saturating_sub(actual),
        }
    }

    pub fn reached(&self) -> bool {
        self.progress >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueSplit {
    pub first_half: u64,
    pub second_half: u64,
}

/// The first `len / 2` days against the rest.
pub fn revenue_split(series: &[DailyStats]) -> RevenueSplit {
    let (first, second) = series.split_at(series.len() / 2);
    RevenueSplit {
        first_half: first.iter().map(|d| d.revenue).sum(),
        second_half: second.iter().map(|d| d.revenue).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthIndicator {
    pub value: f64,
    pub reference: f64,
    pub delta: f64,
}

impl GrowthIndicator {
    fn against(value: u64, reference_ratio: f64) -> Self {
        let value = value as f64;
        let reference = value * reference_ratio;
        Self {
            value,
            reference,
            delta: value - reference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthIndicators {
    pub revenue: GrowthIndicator,
    pub subscribers: GrowthIndicator,
}

pub fn growth_indicators(summary: &MetricSummary) -> GrowthIndicators {
    GrowthIndicators {
        revenue: GrowthIndicator::against(summary.total_revenue, 0.8),
        subscribers: GrowthIndicator::against(summary.total_subs, 0.9),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFan {
    pub rank: usize,
    pub name: String,
    pub amount: u64,
}

/// Highest-revenue fans first; ties keep directory order.
pub fn top_fans(fans: &[Fan], limit: usize) -> Vec<TopFan> {
    let mut ranked: Vec<&Fan> = fans.iter().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, fan)| TopFan {
            rank: i + 1,
            name: fan.name.clone(),
            amount: fan.revenue,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub icon: &'static str,
    pub text: &'static str,
    pub color: &'static str,
}

const WEEKLY_ACHIEVEMENTS: [Achievement; 3] = [
    Achievement {
        icon: "✅",
        text: "Revenue plan met on 3 of 5 days",
        color: "#4CAF50",
    },
    Achievement {
        icon: "✅",
        text: "2 streams in a row with avg watch > 20 min",
        color: "#4CAF50",
    },
    Achievement {
        icon: "🎯",
        text: "New daily subscriber record: +15",
        color: "#FFD700",
    },
];

/// The week's fixed achievements, led by any goal that has been reached.
pub fn weekly_achievements(revenue: &GoalProgress, subscribers: &GoalProgress) -> Vec<Achievement> {
    let mut achievements = WEEKLY_ACHIEVEMENTS.to_vec();

    if revenue.reached() {
        achievements.insert(
            0,
            Achievement {
                icon: "🎉",
                text: "Weekly revenue goal reached!",
                color: "#FF9800",
            },
        );
    }
    if subscribers.reached() {
        achievements.insert(
            0,
            Achievement {
                icon: "🎉",
                text: "Weekly subscriber goal reached!",
                color: "#FF9800",
            },
        );
    }
    achievements
}
