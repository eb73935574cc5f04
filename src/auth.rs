//! Entitlement check performed before a driver is constructed

use crate::config::SponsorConfig;

/// Capability deciding whether a driver may be constructed
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_authorized(&self) -> bool {
        self()
    }
}

/// Sponsor token backed authorization
#[derive(Debug, Clone)]
pub struct SponsorToken {
    token: String,
}

impl SponsorToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn from_config(config: &SponsorConfig) -> Self {
        Self::new(config.token.clone())
    }
}

impl Authorizer for SponsorToken {
    fn is_authorized(&self) -> bool {
        !self.token.trim().is_empty()
    }
}
