pub const GREETING: &str = "Hello from Deno API";

/// Liveness probe
pub async fn hello() -> &'static str {
    GREETING
}
