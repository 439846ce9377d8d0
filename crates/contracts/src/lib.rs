//! Общие типы прокатной системы: агрегаты, DTO, проверки и расчёт показателей.
//!
//! Крейт собирается и для сервера, и для wasm-клиента, поэтому не содержит ввода-вывода.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
