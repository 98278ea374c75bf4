/// The verdict produced by evaluating a single request path.
///
/// A `Decision` is computed fresh for every request and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request to the next handler unchanged.
    Admit,
    /// Answer with an access-denied status and do not forward.
    Reject,
}

impl Decision {
    /// Returns `true` if the request should be forwarded.
    pub fn is_admit(self) -> bool {
        matches!(self, Decision::Admit)
    }

    /// Returns `true` if the request should be rejected.
    pub fn is_reject(self) -> bool {
        matches!(self, Decision::Reject)
    }
}
