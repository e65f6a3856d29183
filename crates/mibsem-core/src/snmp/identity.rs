//! `MODULE-IDENTITY` and `OBJECT-IDENTITY`.

use super::Status;
use crate::value::Value;

/// One `REVISION` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    /// Revision date, an `ExtUTCTime` string value.
    pub value: Value,
    /// Revision text.
    pub description: String,
}

/// `MODULE-IDENTITY` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleIdentity {
    /// `LAST-UPDATED`.
    pub last_updated: String,
    /// `ORGANIZATION`.
    pub organization: String,
    /// `CONTACT-INFO`.
    pub contact_info: String,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REVISION` clauses, newest first as written.
    pub revisions: Vec<Revision>,
}

/// `OBJECT-IDENTITY` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectIdentity {
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
}
