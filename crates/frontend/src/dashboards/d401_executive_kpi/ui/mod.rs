mod dashboard;

pub use dashboard::ExecutiveKpiDashboard;
