pub mod orchestrator;

pub use orchestrator::{
    build_view, HolderAnalytics, HolderPage, HolderSnapshot, SnapshotConfig, SnapshotError,
    ViewQuery,
};
