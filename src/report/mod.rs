//! Report aggregation core
//!
//! Pure transformations that join member, project, and KPI rows into the
//! per-member, per-month nested structure the dashboard serves, plus the
//! severity ranking and trend helpers that depend on it. Everything here is
//! stateless: full snapshots in, full results out, no caching.

pub mod aggregate;
pub mod month;
pub mod ranker;
pub mod status;
pub mod trend;

pub use aggregate::{
    build_member_views, KpiHistoryPoint, KpiMetric, MemberView, MonthlyReport, ProjectEntry,
};
pub use month::{is_valid_month_key, month_label};
pub use ranker::rank_by_severity;
pub use status::ProjectStatus;
pub use trend::{compute_trend, Trend, TrendDirection};
