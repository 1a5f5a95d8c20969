// Drive behavior knobs. The embedded shell persists these somewhere
// and hands us a read-only copy at construction.

// Structs, Enums, Flags

/// How fast the virtual disk "rewinds" to byte zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewindSpeed {
    /// Emulate the full revolution delay of the real mechanism.
    #[default]
    Original,
    /// Snap the head back instantly and only hold NOT_READY briefly.
    Turbo,
}

/// Where saved changes end up on the storage medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStrategy {
    /// Overwrite the original image file.
    #[default]
    InPlace,
    /// Overwrite the original, but keep a pristine `<name>.bak` copy
    /// from before the first save.
    RewriteBackup,
    /// Never touch the original: redirect all saves (and subsequent
    /// loads) to `EDN8/gamedata/<name>/bram.srm`.
    Everdrive,
}

/// Everything the drive wants to know about user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveSettings {
    pub rewind_speed: RewindSpeed,
    pub save_strategy: SaveStrategy,
}
