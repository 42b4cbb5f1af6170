/// Status codes returned across the bridge. Shared between the plugin
/// and the embedding engine's managed runtime.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleStatus {
    Ok = 0,
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidArgument = 3,
    InvalidLogType = 4,
    DuplicateId = 5,
    UnknownId = 6,
    IndexOutOfRange = 7,
    InvalidValue = 8,
    InternalError = 9,
}
