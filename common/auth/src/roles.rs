/// The only elevated role. Matching is exact: `"Admin"` or `" admin"` grant nothing.
pub const ROLE_ADMIN: &str = "admin";

pub fn is_admin(role: Option<&str>) -> bool {
    role == Some(ROLE_ADMIN)
}
