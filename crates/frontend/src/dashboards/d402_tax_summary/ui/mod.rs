mod dashboard;

pub use dashboard::TaxSummaryDashboard;
