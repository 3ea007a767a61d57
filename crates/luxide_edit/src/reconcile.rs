//! Validity-gated partial update
//!
//! Copies a candidate form into the live document one leaf at a time,
//! asking a [`ValidityOracle`] about each leaf before committing it.
//!
//! ## Key Concepts
//!
//! - Only keys present in the candidate are visited. Keys that exist only
//!   in the target are left alone.
//! - A key whose value is an object on both sides is descended into. Any
//!   other key is a leaf, including a whole object missing from the target.
//! - Checks are awaited strictly one after another in document order.
//!   Rejected leaves keep their old value and the walk continues.

use crate::oracle::ValidityOracle;
use crate::path::join;
use futures_util::future::BoxFuture;
use luxide_schema::{Map, Value};

/// Outcome of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Paths whose candidate value was copied, in visit order
    pub committed: Vec<String>,
    /// Paths the oracle rejected, with its message
    pub rejected: Vec<(String, String)>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn rejection(&self, path: &str) -> Option<&str> {
        self.rejected
            .iter()
            .find(|(rejected, _)| rejected == path)
            .map(|(_, message)| message.as_str())
    }
}

fn walk<'a>(
    candidate: &'a Map,
    target: &'a mut Map,
    prefix: String,
    oracle: &'a dyn ValidityOracle,
    report: &'a mut ReconcileReport,
) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        for (key, candidate_value) in candidate {
            let path = join(&prefix, key);

            if let (Some(candidate_child), Some(Value::Object(target_child))) =
                (candidate_value.as_object(), target.get_mut(key))
            {
                walk(candidate_child, target_child, path, oracle, report).await;
                continue;
            }

            match oracle.check(&path).await {
                None => {
                    target.insert(key.clone(), candidate_value.clone());
                    report.committed.push(path);
                }
                Some(message) => {
                    log::debug!("Rejected '{}': {}", path, message);
                    report.rejected.push((path, message));
                }
            }
        }
    })
}

/// Copy every valid leaf of `candidate` into `target`.
///
/// Both roots are expected to be objects. Anything else leaves `target`
/// untouched and yields an empty report.
pub async fn reconcile(
    candidate: &Value,
    target: &mut Value,
    oracle: &dyn ValidityOracle,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let (Some(candidate), Some(target)) = (candidate.as_object(), target.as_object_mut()) else {
        log::warn!("Reconcile skipped: candidate and target must both be objects");
        return report;
    };

    walk(candidate, target, String::new(), oracle, &mut report).await;

    log::debug!(
        "Reconciled {} fields, rejected {}",
        report.committed.len(),
        report.rejected.len()
    );
    report
}
