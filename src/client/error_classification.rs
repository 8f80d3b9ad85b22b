//! Status code classification

use crate::transport::RawResponse;
use crate::Error;

/// Which endpoint produced a response. Only verify maps 429 to [`Error::RateLimited`];
/// on the account endpoint a 429 stays a generic [`Error::Api`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Verify,
    Account,
}

impl Operation {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Operation::Verify => "/api/v1/verify",
            Operation::Account => "/api/v1/account",
        }
    }

    fn maps_rate_limit(self) -> bool {
        matches!(self, Operation::Verify)
    }
}

/// Map a completed exchange to an error, or `None` when the body should be decoded.
pub(crate) fn classify_response(op: Operation, resp: &RawResponse) -> Option<Error> {
    match resp.status {
        401 => Some(Error::Unauthorized),
        429 if op.maps_rate_limit() => Some(Error::RateLimited),
        _ if resp.is_success() => None,
        status => Some(Error::Api {
            status,
            body: resp.body_text(),
        }),
    }
}
