//! Сессии пользователей: refresh-токены с адресом и клиентом входа
pub mod repository;
pub mod service;
