pub mod api;
pub mod ui;

/// Имя коллекции в REST и в событиях изменений
pub const COLLECTION: &str = "customer";
