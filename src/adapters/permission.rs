use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{self, BoxFuture};
use tracing::debug;

use crate::collaborators::{Permission, PermissionBroker};
use crate::config::PermissionPolicy;

/// Permission broker answering from the configured policy.
pub struct ConfiguredPermission {
    policy: PermissionPolicy,
    granted: AtomicBool,
}

impl ConfiguredPermission {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self {
            policy,
            granted: AtomicBool::new(policy == PermissionPolicy::Granted),
        }
    }

    fn current(&self) -> Permission {
        if self.granted.load(Ordering::Acquire) {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }
}

impl PermissionBroker for ConfiguredPermission {
    fn query(&self) -> BoxFuture<'_, Permission> {
        Box::pin(future::ready(self.current()))
    }

    fn request(&self) -> BoxFuture<'_, Permission> {
        if self.policy == PermissionPolicy::AskOnce {
            debug!("photo library access granted on request");
            self.granted.store(true, Ordering::Release);
        }
        Box::pin(future::ready(self.current()))
    }
}
