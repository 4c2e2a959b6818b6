pub mod attachment;
pub mod context;
pub mod entity;
pub mod frame;
pub mod msg;
pub mod node;
pub mod publisher;
pub mod pubsub;
pub mod qos;
pub mod queue;
pub mod ros_msg;
pub mod snapshot;
pub mod topic_name;

pub use zenoh::Result;

pub trait Builder {
    type Output;
    fn build(self) -> Result<Self::Output>;
}
