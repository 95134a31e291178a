//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - auth call to fetch data, `$auth` is the complete `Authorization` header value
///
#[macro_export]
macro_rules! http_get_auth {
    ($self:ident, $url:expr, $auth:expr) => {
        $self
            .client
            .get($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("accept", "application/json")
            .header("authorization", $auth)
            .send()
    };
}
