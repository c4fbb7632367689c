//! Request gate.
//!
//! # Request State Machine
//! ```text
//! admit:     throttle ──reject──▶ TooManyRequests
//!               │ accept (slot updated)
//!               ▼
//!            path match ──none──▶ NotFound
//!               │       ──bad id─▶ BadRequest
//!               ▼
//! authorize: mutating? ──no──▶ dispatch
//!               │ yes
//!               ▼
//!            token valid? ──no──▶ Unauthorized
//!               │ yes
//!               ▼
//!            dispatch
//! ```
//!
//! Both steps are synchronous and never block on I/O. The slot is updated as
//! soon as the throttle accepts, even if a later step rejects the request.

use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::{Route, RouteTable};
use crate::security::error::GateError;
use crate::security::throttle::Throttle;
use crate::security::tokens::{Token, TokenIssuer};

/// Decides, per request, whether and where to dispatch.
pub struct RequestGate {
    throttle: Throttle,
    routes: RouteTable,
    tokens: Arc<TokenIssuer>,
}

impl RequestGate {
    pub fn new(throttle: Throttle, routes: RouteTable, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            throttle,
            routes,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Throttle check, then path match.
    pub fn admit(&self, path: &str) -> Result<Route, GateError> {
        if !self.throttle.try_acquire() {
            tracing::warn!(path = %path, "Request throttled");
            return Err(GateError::TooManyRequests);
        }

        let route = self.routes.match_path(path)?;
        Ok(route)
    }

    /// Token enforcement for mutating routes; other routes pass untouched.
    pub fn authorize(&self, route: &Route, candidate: Option<&Token>) -> Result<(), GateError> {
        if !route.is_mutating() {
            return Ok(());
        }

        match candidate {
            Some(token) if self.tokens.validate(token) => Ok(()),
            Some(token) => {
                tracing::warn!(route = route.name(), token_id = token.id, "Form token rejected");
                metrics::record_token_rejected();
                Err(GateError::Unauthorized)
            }
            None => {
                tracing::warn!(route = route.name(), "Form token missing");
                metrics::record_token_rejected();
                Err(GateError::Unauthorized)
            }
        }
    }

    /// `admit` followed by `authorize`.
    pub fn check(&self, path: &str, candidate: Option<&Token>) -> Result<Route, GateError> {
        let route = self.admit(path)?;
        self.authorize(&route, candidate)?;
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn gate(min_interval: Duration) -> RequestGate {
        RequestGate::new(
            Throttle::new(min_interval),
            RouteTable::notes(),
            Arc::new(TokenIssuer::new()),
        )
    }

    #[test]
    fn test_read_routes_need_no_token() {
        let gate = gate(Duration::ZERO);
        assert_eq!(gate.check("/", None).unwrap(), Route::Index);
        assert_eq!(gate.check("/Note/42", None).unwrap(), Route::ViewNote { id: 42 });
        assert_eq!(gate.check("/EditNote/3", None).unwrap(), Route::EditNote { id: 3 });
    }

    #[test]
    fn test_mutating_route_requires_token() {
        let gate = gate(Duration::ZERO);
        assert!(matches!(gate.check("/NewNote/", None), Err(GateError::Unauthorized)));

        let token = gate.tokens().issue();
        assert_eq!(gate.check("/NewNote/", Some(&token)).unwrap(), Route::NewNote);
        assert_eq!(
            gate.check("/ConfirmDeleteNote/9", Some(&token)).unwrap(),
            Route::ConfirmDeleteNote { id: 9 }
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let gate = gate(Duration::ZERO);
        let token = gate.tokens().issue();
        let other = gate.tokens().issue();

        let forged = Token { id: token.id, secret: other.secret };
        assert!(matches!(
            gate.check("/SaveNote/1", Some(&forged)),
            Err(GateError::Unauthorized)
        ));

        let unknown = Token { id: 1000, secret: token.secret };
        assert!(matches!(
            gate.check("/ConfirmPasteBinNote/1", Some(&unknown)),
            Err(GateError::Unauthorized)
        ));
    }

    #[test]
    fn test_rejection_order() {
        let gate = gate(Duration::ZERO);
        // Path errors are reported before token errors.
        assert!(matches!(gate.check("/Nope/", None), Err(GateError::NotFound(_))));
        assert!(matches!(
            gate.check("/SaveNote/99999999999999999999", None),
            Err(GateError::BadRequest(_))
        ));
    }

    #[test]
    fn test_throttle_runs_first() {
        let gate = gate(Duration::from_secs(60));
        assert!(gate.admit("/").is_ok());
        // Even an unknown path is throttled before it is matched.
        assert!(matches!(gate.admit("/Nope/"), Err(GateError::TooManyRequests)));
        assert!(matches!(gate.admit("/"), Err(GateError::TooManyRequests)));
    }

    #[test]
    fn test_rejected_requests_still_take_slot() {
        let gate = gate(Duration::from_secs(60));
        assert!(matches!(gate.admit("/Nope/"), Err(GateError::NotFound(_))));
        assert!(matches!(gate.admit("/"), Err(GateError::TooManyRequests)));
    }
}
