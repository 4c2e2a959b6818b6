use std::time::Duration;

use viz_z::{
    Builder,
    attachment::Attachment,
    context::{ZContext, ZContextBuilder},
    frame::{FrameSnapshot, FrameStore},
    msg::ZMessage,
    publisher::{CancelToken, MarkerPublishLoop},
    qos::QosProfile,
    ros_msg::{Marker, MarkerArray, Point},
    snapshot::{Polygon, SnapshotSource},
};

fn test_context() -> ZContext {
    // Single in-process session, no discovery needed
    ZContextBuilder::default()
        .disable_multicast_scouting()
        .build()
        .expect("Failed to create context")
}

fn unit_square() -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn polygon_marker_reaches_subscriber_unchanged() {
    let ctx = test_context();
    let node = ctx.create_node("polygon_e2e").build().unwrap();

    let publisher = node
        .create_pub::<MarkerArray>("/marker_test")
        .build()
        .unwrap();
    let subscriber = node
        .create_sub::<MarkerArray>("/marker_test")
        .build()
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let polygon = unit_square();
    publisher.publish(&polygon.current_snapshot()).unwrap();

    let received = subscriber.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(received.markers.len(), 1);
    assert_eq!(received.markers[0].points, polygon.points());

    ctx.shutdown().unwrap();
}

#[test]
fn publish_loop_emits_monotonic_stamps_until_cancelled() {
    let ctx = test_context();
    let node = ctx.create_node("loop_e2e").build().unwrap();

    let publisher = node
        .create_pub::<MarkerArray>("/marker_loop")
        .with_qos(QosProfile::keep_last(10))
        .build()
        .unwrap();
    let subscriber = node
        .create_sub::<MarkerArray>("/marker_loop")
        .build()
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let publish_loop =
        MarkerPublishLoop::new(publisher, unit_square(), Duration::from_millis(50));
    let cancel = CancelToken::new();
    let loop_cancel = cancel.clone();
    let handle = std::thread::spawn(move || publish_loop.run(&loop_cancel));

    let mut stamps = Vec::new();
    for _ in 0..3 {
        let array = subscriber.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(array.markers.len(), 1);
        stamps.push(array.markers[0].header.stamp);
    }
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

    cancel.cancel();
    handle.join().unwrap().unwrap();

    ctx.shutdown().unwrap();
}

#[test]
fn publish_once_sends_a_single_stamped_array() {
    let ctx = test_context();
    let node = ctx.create_node("once_e2e").build().unwrap();

    let publisher = node
        .create_pub::<MarkerArray>("/marker_once")
        .build()
        .unwrap();
    let subscriber = node
        .create_sub::<MarkerArray>("/marker_once")
        .build()
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let publish_loop =
        MarkerPublishLoop::new(publisher, unit_square(), Duration::from_millis(50));
    publish_loop.publish_once().unwrap();

    let array = subscriber.recv_timeout(Duration::from_secs(2)).unwrap();
    let stamp = array.markers[0].header.stamp;
    assert!(stamp.sec > 0);
    // Exactly one array was published
    assert!(subscriber.try_recv().is_none());
    assert!(!subscriber.is_ready());

    ctx.shutdown().unwrap();
}

#[test]
fn frame_store_loop_emits_pose_markers_per_interval() {
    let store_path =
        std::env::temp_dir().join(format!("viz_z_e2e_store_{}.json", std::process::id()));
    std::fs::write(
        &store_path,
        r#"{
            "frames": [
                {"name": "drone_0", "position": [1.0, 2.0, 3.0], "orientation": [0.0, 0.0, 0.0, 1.0], "time": 0.0}
            ]
        }"#,
    )
    .unwrap();
    let store = FrameStore::load(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();
    let snapshot = FrameSnapshot::new(&store, 0).unwrap().with_frame_id("world");

    let ctx = test_context();
    let node = ctx.create_node("frame_e2e").build().unwrap();

    let publisher = node
        .create_pub::<MarkerArray>("/frame_loop")
        .build()
        .unwrap();
    let subscriber = node
        .create_sub::<MarkerArray>("/frame_loop")
        .build()
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let publish_loop = MarkerPublishLoop::new(publisher, snapshot, Duration::from_millis(50));
    let cancel = CancelToken::new();
    let loop_cancel = cancel.clone();
    let handle = std::thread::spawn(move || publish_loop.run(&loop_cancel));

    let mut stamps = Vec::new();
    for _ in 0..3 {
        let array = subscriber.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(array.markers.len(), 2);
        assert_eq!(array.markers[0].type_, Marker::SPHERE);
        assert_eq!(array.markers[0].pose.position, Point::new(1.0, 2.0, 3.0));
        assert_eq!(array.markers[0].header.frame_id, "world");
        assert_eq!(array.markers[1].text, "drone_0");
        stamps.push(array.markers[0].header.stamp);
    }
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

    cancel.cancel();
    handle.join().unwrap().unwrap();

    ctx.shutdown().unwrap();
}

#[test]
fn attachments_carry_sequence_numbers_and_gid() {
    let ctx = test_context();
    let node = ctx.create_node("attachment_e2e").build().unwrap();

    let publisher = node
        .create_pub::<MarkerArray>("/marker_attached")
        .with_attachment(true)
        .build()
        .unwrap();
    let subscriber = node
        .create_sub::<MarkerArray>("/marker_attached")
        .build()
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));

    let snapshot = unit_square().current_snapshot();
    publisher.publish(&snapshot).unwrap();
    publisher.publish(&snapshot).unwrap();

    let mut attachments = Vec::new();
    for _ in 0..2 {
        let sample = subscriber
            .recv_serialized_timeout(Duration::from_secs(2))
            .unwrap();
        let payload = sample.payload().to_bytes();
        let decoded = MarkerArray::deserialize(&payload).unwrap();
        assert_eq!(decoded, snapshot);
        let attachment = Attachment::try_from(sample.attachment().unwrap()).unwrap();
        attachments.push(attachment);
    }

    assert_eq!(attachments[0].sequence_number, 0);
    assert_eq!(attachments[1].sequence_number, 1);
    assert_eq!(attachments[0].source_gid, attachments[1].source_gid);
    assert_ne!(attachments[0].source_gid, [0u8; 16]);
    assert!(attachments[0].source_timestamp > 0);

    ctx.shutdown().unwrap();
}
