mod dashboard;

pub use dashboard::FleetAnalyticsDashboard;
