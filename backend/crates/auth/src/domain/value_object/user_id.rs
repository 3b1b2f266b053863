use kernel::id::Id;

pub struct UserMarker;

/// Opaque, server-generated user identifier
pub type UserId = Id<UserMarker>;

/// Fresh random user identifier
pub fn new_user_id() -> UserId {
    UserId::from_trusted(platform::crypto::generate_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_id_is_unique_and_non_blank() {
        let a = new_user_id();
        let b = new_user_id();
        assert!(!a.is_blank());
        assert_ne!(a, b);
    }
}
