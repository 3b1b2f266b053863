use kernel::id::Id;

pub struct SessionMarker;

/// Opaque session token carried in the session cookie
pub type SessionId = Id<SessionMarker>;

/// 160 bits from the OS RNG
pub fn new_session_id() -> SessionId {
    SessionId::from_trusted(platform::crypto::generate_id())
}
