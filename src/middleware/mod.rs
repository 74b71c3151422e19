/// Middleware module
///
/// The JWT request gate for protected routes.

mod jwt_middleware;

pub use jwt_middleware::JwtMiddleware;
