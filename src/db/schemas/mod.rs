//! Database schemas for Pulseboard
//!
//! Defines MongoDB document structures for accounts, team members,
//! project entries, and monthly KPI entries. Collection names match the
//! dashboard's original table naming.

mod account;
mod kpi;
mod member;
mod metadata;
mod project;

pub use account::{AccountDoc, ACCOUNT_COLLECTION};
pub use kpi::{KpiDoc, KPI_COLLECTION};
pub use member::{MemberDoc, MEMBER_COLLECTION};
pub use metadata::Metadata;
pub use project::{ProjectDoc, PROJECT_COLLECTION};
