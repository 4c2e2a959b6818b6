//! Load a frame store from disk and republish one frame's markers on a period.

use std::time::Duration;

use clap::Parser;
use viz_z::{
    Builder, Result,
    context::ZContextBuilder,
    frame::{FrameSnapshot, FrameStore},
    publisher::{CancelToken, MarkerPublishLoop},
    ros_msg::MarkerArray,
};

#[derive(Parser, Debug)]
struct Args {
    /// Path to the JSON frame store
    #[arg(long)]
    store: String,

    /// Sample index to publish
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Publish period in milliseconds
    #[arg(long, default_value_t = 1000)]
    period_ms: u64,

    #[arg(long, default_value = "marker_test")]
    topic: String,

    #[arg(long, default_value = "map")]
    frame_id: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Load failures surface here, before any transport is set up
    let store = FrameStore::load(&args.store).map_err(|e| zenoh::Error::from(e.to_string()))?;
    let snapshot = FrameSnapshot::new(&store, args.index)
        .map_err(|e| zenoh::Error::from(e.to_string()))?
        .with_frame_id(&args.frame_id);

    let ctx = ZContextBuilder::default().build()?;
    let node = ctx.create_node("frame_test").build()?;
    let zpub = node.create_pub::<MarkerArray>(&args.topic).build()?;

    println!(
        "Publishing frame {} of {} on /{} every {}ms...",
        args.index,
        store.len(),
        args.topic.trim_start_matches('/'),
        args.period_ms
    );
    let publish_loop =
        MarkerPublishLoop::new(zpub, snapshot, Duration::from_millis(args.period_ms));
    publish_loop.run(&CancelToken::new())
}
