//! The fixed set of demo accounts

use crate::models::{Role, User};

pub static DEMO_USERS: [User; 2] = [
    User {
        id: 1,
        username: "admin",
        password: "admin123",
        role: Role::Admin,
        display_name: "Admin User",
    },
    User {
        id: 2,
        username: "user",
        password: "user123",
        role: Role::User,
        display_name: "Regular User",
    },
];

/// Account whose username and password both match exactly
pub fn find_by_credentials(username: &str, password: &str) -> Option<&'static User> {
    DEMO_USERS
        .iter()
        .find(|u| u.username == username && u.password == password)
}

pub fn find_by_id(id: u64) -> Option<&'static User> {
    DEMO_USERS.iter().find(|u| u.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_must_both_match() {
        assert_eq!(find_by_credentials("admin", "admin123").map(|u| u.id), Some(1));
        assert!(find_by_credentials("admin", "user123").is_none());
        assert!(find_by_credentials("Admin", "admin123").is_none());
        assert!(find_by_credentials("", "").is_none());
    }

    #[test]
    fn test_find_by_id() {
        assert_eq!(find_by_id(2).map(|u| u.role), Some(Role::User));
        assert!(find_by_id(3).is_none());
    }
}
