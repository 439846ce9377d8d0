pub mod aggregate;

pub use aggregate::{
    rental_days, CompleteContractRequest, ContractListItem, ContractStatus, PaymentRequest,
    RentalContract, RentalContractDto, RentalContractId, LATE_FEE_MULTIPLIER,
};
