/// Explicit read/write session state, injected wherever the original
/// design reached for ambient browser storage. Keys are flat strings
/// (auth token, stored user, admin flag and the like).
pub trait SessionContext: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_EMAIL: &str = "user_email";
    pub const IS_ADMIN: &str = "is_admin";
}
