use bon::Builder;
use serde::Serialize;

/// A per-frame auxiliary data channel (time stamp, frame tracking number,
/// ...) declared in the footer's `MetaBlock`. Only the layout is kept.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize)]
pub struct MetadataChannel {
    /// Element name as written in the footer, e.g. `TimeStamp`.
    #[builder(into)]
    pub kind: String,
    /// Bytes per value, derived from the declared bit depth.
    pub byte_width: usize,
    /// Trigger event; only recorded together with `resolution`.
    pub event: Option<String>,
    /// Ticks per second; only recorded together with `event`.
    pub resolution: Option<i64>,
}
