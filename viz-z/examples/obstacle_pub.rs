//! Republish a fixed obstacle outline once per second for viewer inspection.

use std::time::Duration;

use viz_z::{
    Builder, Result,
    context::ZContextBuilder,
    publisher::{CancelToken, MarkerPublishLoop},
    ros_msg::{MarkerArray, Point},
    snapshot::Polygon,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ctx = ZContextBuilder::default().build()?;
    let node = ctx.create_node("obstacle_test").build()?;
    let zpub = node.create_pub::<MarkerArray>("marker_test").build()?;

    let polygon = Polygon::new(vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ])
    .map_err(|e| zenoh::Error::from(e.to_string()))?;

    println!("Publishing obstacle outline on /marker_test...");
    let publish_loop = MarkerPublishLoop::new(zpub, polygon, Duration::from_secs(1));
    publish_loop.run(&CancelToken::new())
}
