//! Navigation seam between session logic and the host shell.

/// Issues client-side redirects.
///
/// Implemented by whichever shell hosts the client core (desktop
/// webview, SPA router); tests use a recording double. Redirects are
/// fire-and-forget navigation instructions, never errors.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}
