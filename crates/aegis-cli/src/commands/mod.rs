pub mod assessment;
pub mod dispatch;
pub mod flatten;
pub mod import;
pub mod publish;
pub mod retire;
pub mod snapshots;
pub mod tree;
