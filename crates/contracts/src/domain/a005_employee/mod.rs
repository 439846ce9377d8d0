pub mod aggregate;

pub use aggregate::{
    DepartmentPayroll, Employee, EmployeeDto, EmployeeId, EmployeeStatus, PayrollSummary,
};
