/// Control command accepted on a channeler's command endpoint
///
/// The actor matches on this enum exhaustively, so a new variant cannot be
/// added without deciding how the actor reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelerCmd {
    /// Close the outputter and both endpoints without draining pending records
    Stop,
}
