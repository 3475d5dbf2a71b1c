pub struct Icons;

impl Icons {
    pub const LEDGER: &str = "📒";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const TAG: &str = "🏷️";
    pub const GLOBE: &str = "🌍";
    pub const EMPTY: &str = "∅";
}
