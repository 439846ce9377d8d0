mod dashboard;

pub use dashboard::SecurityOverviewDashboard;
