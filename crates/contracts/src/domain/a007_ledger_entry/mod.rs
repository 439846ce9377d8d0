pub mod aggregate;

pub use aggregate::{
    LedgerEntry, LedgerEntryDto, LedgerEntryId, LedgerKind, LedgerSummary, CATEGORY_RENTAL,
};
