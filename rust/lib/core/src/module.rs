use axum::Router;

/// A business module that contributes HTTP routes.
///
/// Each module (auth, catalog) implements this trait; the server binary
/// collects all modules and merges their routes under `/api`.
pub trait Module: Send + Sync {
    /// Module name, used for startup logging.
    fn name(&self) -> &str;

    /// The module's routes, relative to the `/api` mount point.
    fn routes(&self) -> Router;
}
