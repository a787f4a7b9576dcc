//! Deterministic fault injection for collaborator requests
//!
//! Faults are keyed by request name (see [`host_api::RequestKind::name`]).
//!
//! ## Example
//!
//! ```
//! use sim_host::fault_injection::{FaultPlan, RequestFault};
//! use host_api::HostError;
//!
//! let plan = FaultPlan::new()
//!     .with_fault(RequestFault::FailNext {
//!         request: "tabs.activate".to_string(),
//!         error: HostError::Rejected("Invalid tab ID: 9".to_string()),
//!         count: 1,
//!     })
//!     .with_fault(RequestFault::Hold {
//!         request: "tabs.list".to_string(),
//!     });
//! assert_eq!(plan.faults().len(), 2);
//! ```

use host_api::HostError;

/// A fault to inject into request handling
#[derive(Debug, Clone, PartialEq)]
pub enum RequestFault {
    /// Answer the next `count` matching requests with `error`
    FailNext {
        request: String,
        error: HostError,
        count: usize,
    },

    /// Leave matching requests unanswered until released
    Hold { request: String },
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<RequestFault>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(mut self, fault: RequestFault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn faults(&self) -> &[RequestFault] {
        &self.faults
    }
}

/// What to do with one request
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Execute,
    Fail(HostError),
    Hold,
}

/// Applies a [`FaultPlan`], consuming counted faults as they fire
#[derive(Debug, Default)]
pub struct FaultInjector {
    faults: Vec<RequestFault>,
}

impl FaultInjector {
    pub fn new(plan: FaultPlan) -> Self {
        Self {
            faults: plan.faults,
        }
    }

    pub fn add(&mut self, fault: RequestFault) {
        self.faults.push(fault);
    }

    /// Removes every hold; held requests are then released by the host
    pub fn clear_holds(&mut self) {
        self.faults
            .retain(|fault| !matches!(fault, RequestFault::Hold { .. }));
    }

    pub fn verdict(&mut self, request: &str) -> Verdict {
        for fault in self.faults.iter_mut() {
            match fault {
                RequestFault::Hold { request: held } if held == request => return Verdict::Hold,
                RequestFault::FailNext {
                    request: failing,
                    error,
                    count,
                } if failing == request && *count > 0 => {
                    *count -= 1;
                    return Verdict::Fail(error.clone());
                }
                _ => {}
            }
        }
        Verdict::Execute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_next_counts_down() {
        let mut injector = FaultInjector::new(FaultPlan::new().with_fault(RequestFault::FailNext {
            request: "tabs.close".to_string(),
            error: HostError::Timeout,
            count: 2,
        }));
        assert_eq!(injector.verdict("tabs.list"), Verdict::Execute);
        assert_eq!(injector.verdict("tabs.close"), Verdict::Fail(HostError::Timeout));
        assert_eq!(injector.verdict("tabs.close"), Verdict::Fail(HostError::Timeout));
        assert_eq!(injector.verdict("tabs.close"), Verdict::Execute);
    }

    #[test]
    fn test_holds_until_cleared() {
        let mut injector = FaultInjector::default();
        injector.add(RequestFault::Hold {
            request: "tabs.list".to_string(),
        });
        assert_eq!(injector.verdict("tabs.list"), Verdict::Hold);
        assert_eq!(injector.verdict("tabs.list"), Verdict::Hold);
        injector.clear_holds();
        assert_eq!(injector.verdict("tabs.list"), Verdict::Execute);
    }
}
