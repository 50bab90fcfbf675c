//! Permission resolution, role switching and their application ports.

#![forbid(unsafe_code)]

mod authorization_config;
mod authorization_ports;
mod authorization_service;
mod permission_resolver;
mod role_switch;

pub use authorization_config::{AuthorizationConfig, DEFAULT_ROLE};
pub use authorization_ports::{AuditEvent, AuditRepository, UserProfileRepository};
pub use authorization_service::AuthorizationService;
pub use permission_resolver::{GrantSource, PermissionDecision, PermissionResolver};
pub use role_switch::{RoleSwitchController, RoleSwitchDenied, RoleSwitchOutcome};
