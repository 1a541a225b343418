//! Record access policies.
//!
//! The gateway consults exactly one policy between token verification and
//! returning a record. The default, [`NoOwnershipCheck`], grants every
//! authenticated subject every record: that is the IDOR under study.
//! [`OwnerOnly`] is the secure variant used for comparison.

mod policy;

pub use policy::*;
