// ABOUTME: Injectable identity provider for the username sent in the INIT RPC.
// ABOUTME: Keeps the OS-user lookup out of Session so tests can pin a deterministic value.

/// Supplies the username a [`Session`](crate::session::Session) sends during INIT.
///
/// The SANE control protocol has no authentication content of its own (see
/// `AuthRequired`); the only identity-bearing field on the wire is this
/// username string. Factoring it through a trait means a test harness can
/// pin a known value instead of depending on the OS user running the suite.
pub trait IdentityProvider: Send + Sync {
    /// Returns the username to send as the INIT RPC's username argument.
    fn username(&self) -> String;
}

/// Default identity provider, backed by the OS's notion of the current user.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsIdentityProvider;

impl IdentityProvider for OsIdentityProvider {
    fn username(&self) -> String {
        whoami::username()
    }
}

/// A fixed-value identity provider, for tests and callers who want to
/// override the username without impersonating the OS user.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider(pub String);

impl IdentityProvider for StaticIdentityProvider {
    fn username(&self) -> String {
        self.0.clone()
    }
}
