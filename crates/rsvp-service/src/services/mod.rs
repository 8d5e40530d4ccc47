pub mod account_service;
pub mod activation_service;
pub mod admin_service;
pub mod attendant_service;
pub mod auth_service;
pub mod config_service;
pub mod invitation_service;
pub mod meal_service;
pub mod notification_service;
pub mod registration_service;
pub mod stats_service;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
