use kernel::id::Id;

pub struct ClientMarker;

/// Public identifier of an OAuth2 client
pub type ClientId = Id<ClientMarker>;

/// Length of generated client identifiers (hex characters)
pub const CLIENT_ID_LEN: usize = 12;

pub fn new_client_id() -> ClientId {
    let mut id = platform::crypto::generate_id();
    id.truncate(CLIENT_ID_LEN);
    ClientId::from_trusted(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_id_is_short_hex() {
        let id = new_client_id();
        assert_eq!(id.as_str().len(), CLIENT_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
