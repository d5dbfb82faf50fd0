// ── Device directory storage ──
//
// The directory is the only shared mutable state in the core. Everything
// else (topology, detail views, samplers) derives from its snapshots.

mod directory;

pub use directory::DeviceDirectory;
