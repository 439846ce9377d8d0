pub mod d400_fleet_analytics;
pub mod d401_executive_kpi;
pub mod d402_tax_summary;
pub mod d403_security_overview;
