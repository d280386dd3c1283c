use chrono::{DateTime, Utc};

/// Assembled view for the teacher class dashboard endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherDashboard {
    pub class_id: String,
    pub completion_rate: f64,
    pub avg_score: Option<f64>,
    pub at_risk_students: Vec<AtRiskStudent>,
    pub recent_activity: Vec<RecentActivity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtRiskStudent {
    pub student_id: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentActivity {
    pub event_type: String,
    pub student_id: String,
    pub assignment_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentMasteryView {
    pub student_id: String,
    pub mastery: Vec<StandardMastery>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardMastery {
    pub standard_id: String,
    pub mastery_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentTimeline {
    pub student_id: String,
    pub class_id: String,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub event_type: String,
    pub assignment_id: String,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
}
