//! Core types: event records, freshness filter, report rendering

pub mod event;
pub mod format;
pub mod freshness;
pub mod tracing;

pub use event::{ColorDefinition, ColorPalette, EventListing, EventRecord, OwnerDetails};
pub use format::{
    banner, framed, render_daily_updated, render_event_listing, render_owner_details, rule,
};
pub use freshness::{
    daily_cutoff, filter_and_format, DisplayLine, FreshnessError, FreshnessReport,
    PRIVATE_BUSY_LABEL,
};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
