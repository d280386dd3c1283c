pub mod dashboard;
pub mod event;
pub mod outbox;
pub mod risk;
pub mod rollup;

pub use dashboard::{AtRiskStudent, RecentActivity, StandardMastery, StudentMasteryView, StudentTimeline, TeacherDashboard, TimelineEvent};
pub use event::{Event, EventType, IncomingEvent};
pub use outbox::{OutboxItem, OutboxStatus};
pub use risk::RiskReason;
pub use rollup::ClassRollup;
