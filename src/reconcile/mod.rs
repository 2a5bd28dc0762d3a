//! Attendance, leave and dues reconciliation
//!
//! Everything here is a pure function of its inputs. Callers pass in the
//! reference date, so nothing reads the clock.

mod attendance;
mod dues;
mod leave;
mod month;
mod subscription;

pub use attendance::{merge_approved_leaves, summarize_month, AttendanceSummary, UnmarkedDayPolicy};
pub use dues::{
    latest_payment, next_payment, outstanding_dues, total_pending, SubscriptionPlan, FLAT_PLAN_THRESHOLD,
};
pub use leave::{days_in_month, inclusive_days, leave_statistics, LeaveStatistics};
pub use month::Month;
pub use subscription::{SubscriptionPeriod, DEFAULT_PLAN_DAYS};
