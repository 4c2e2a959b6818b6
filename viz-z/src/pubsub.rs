use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, info, trace};
use zenoh::liveliness::LivelinessToken;
use zenoh::{Result, Session, Wait, sample::Sample};

use crate::Builder;
use crate::attachment::{Attachment, GidArray};
use crate::entity::{EndpointEntity, TypeInfo};
use crate::msg::{CdrSerdes, ZDeserializer, ZMessage, ZSerializer};
use crate::qos::{QosDurability, QosHistory, QosProfile, QosReliability};
use crate::queue::BoundedQueue;
use crate::topic_name;

pub struct ZPub<T: ZMessage, S: ZSerializer = CdrSerdes<T>> {
    pub entity: EndpointEntity,
    sn: AtomicUsize,
    gid: GidArray,
    inner: zenoh::pubsub::Publisher<'static>,
    _lv_token: LivelinessToken,
    with_attachment: bool,
    _phantom_data: PhantomData<(T, S)>,
}

#[derive(Debug)]
pub struct ZPubBuilder<T, S = CdrSerdes<T>> {
    pub entity: EndpointEntity,
    pub session: Arc<Session>,
    pub with_attachment: bool,
    pub _phantom_data: PhantomData<(T, S)>,
}

impl<T, S> ZPubBuilder<T, S> {
    pub fn with_qos(mut self, qos: QosProfile) -> Self {
        self.entity.qos = qos;
        self
    }

    pub fn with_type_info(mut self, type_info: TypeInfo) -> Self {
        self.entity.type_info = Some(type_info);
        self
    }

    pub fn with_attachment(mut self, with_attachment: bool) -> Self {
        self.with_attachment = with_attachment;
        self
    }
}

impl<T, S> Builder for ZPubBuilder<T, S>
where
    T: ZMessage + 'static,
    S: for<'a> ZSerializer<Input<'a> = &'a T> + 'static,
{
    type Output = ZPub<T, S>;

    #[tracing::instrument(name = "pub_build", skip(self), fields(
        topic = %self.entity.topic,
        qos = %self.entity.qos,
    ))]
    fn build(mut self) -> Result<Self::Output> {
        // Qualify the topic name according to ROS 2 rules
        let qualified_topic = topic_name::qualify_topic_name(
            &self.entity.topic,
            &self.entity.node.namespace,
            &self.entity.node.name,
        )
        .map_err(|e| zenoh::Error::from(format!("Failed to qualify topic: {}", e)))?;

        self.entity.topic = qualified_topic;
        let key_expr = self.entity.topic_key_expr()?;
        debug!("[PUB] Key expression: {}", key_expr);

        let mut pub_builder = self.session.declare_publisher(key_expr);

        // Reliable blocks on congestion, BestEffort drops
        pub_builder = match self.entity.qos.reliability {
            QosReliability::Reliable => {
                pub_builder.congestion_control(zenoh::qos::CongestionControl::Block)
            }
            QosReliability::BestEffort => {
                pub_builder.congestion_control(zenoh::qos::CongestionControl::Drop)
            }
        };

        pub_builder = match self.entity.qos.durability {
            QosDurability::TransientLocal => pub_builder.express(true),
            QosDurability::Volatile => pub_builder.express(false),
        };

        let inner = pub_builder.wait()?;
        info!("[PUB] Publisher ready: topic={}", self.entity.topic);

        let lv_token = self
            .session
            .liveliness()
            .declare_token(self.entity.lv_token_key_expr()?)
            .wait()?;
        let gid = self.entity.gid();

        Ok(ZPub {
            entity: self.entity,
            sn: AtomicUsize::new(0),
            inner,
            _lv_token: lv_token,
            gid,
            with_attachment: self.with_attachment,
            _phantom_data: Default::default(),
        })
    }
}

impl<T, S> ZPub<T, S>
where
    T: ZMessage + 'static,
    S: for<'a> ZSerializer<Input<'a> = &'a T> + 'static,
{
    fn new_attachment(&self) -> Attachment {
        let sn = self.sn.fetch_add(1, Ordering::Relaxed);
        trace!("[PUB] Creating attachment: sn={}", sn);
        Attachment::new(sn as _, self.gid)
    }

    #[tracing::instrument(name = "publish", skip(self, msg), fields(
        topic = %self.entity.topic,
        payload_len = tracing::field::Empty
    ))]
    pub fn publish(&self, msg: &T) -> Result<()> {
        let payload = S::serialize(msg).map_err(|e| zenoh::Error::from(e.to_string()))?;
        tracing::Span::current().record("payload_len", payload.len());
        debug!("[PUB] Publishing message");

        let mut put_builder = self.inner.put(payload);
        if self.with_attachment {
            put_builder = put_builder.attachment(self.new_attachment());
        }
        put_builder.wait()
    }
}

pub struct ZSubBuilder<T, S = CdrSerdes<T>> {
    pub entity: EndpointEntity,
    pub session: Arc<Session>,
    pub _phantom_data: PhantomData<(T, S)>,
}

impl<T, S> ZSubBuilder<T, S> {
    pub fn with_qos(mut self, qos: QosProfile) -> Self {
        self.entity.qos = qos;
        self
    }

    pub fn with_type_info(mut self, type_info: TypeInfo) -> Self {
        self.entity.type_info = Some(type_info);
        self
    }
}

impl<T, S> Builder for ZSubBuilder<T, S>
where
    T: ZMessage + 'static + Send + Sync,
    S: ZDeserializer,
{
    type Output = ZSub<T, S>;

    fn build(mut self) -> Result<Self::Output> {
        let qualified_topic = topic_name::qualify_topic_name(
            &self.entity.topic,
            &self.entity.node.namespace,
            &self.entity.node.name,
        )
        .map_err(|e| zenoh::Error::from(format!("Failed to qualify topic: {}", e)))?;

        self.entity.topic = qualified_topic;
        let key_expr = self.entity.topic_key_expr()?;
        debug!("[SUB] Key expression: {}, qos={}", key_expr, self.entity.qos);

        let queue_size = match self.entity.qos.history {
            QosHistory::KeepLast(depth) => depth,
            QosHistory::KeepAll => usize::MAX,
        };
        let queue = Arc::new(BoundedQueue::new(queue_size));

        let handler_queue = queue.clone();
        let inner = self
            .session
            .declare_subscriber(key_expr)
            .callback(move |sample| handler_queue.push(sample))
            .wait()?;

        let lv_token = self
            .session
            .liveliness()
            .declare_token(self.entity.lv_token_key_expr()?)
            .wait()?;

        info!("[SUB] Subscriber ready: topic={}", self.entity.topic);

        Ok(ZSub {
            entity: self.entity,
            queue,
            _inner: inner,
            _lv_token: lv_token,
            _phantom_data: Default::default(),
        })
    }
}

pub struct ZSub<T: ZMessage, S: ZDeserializer = CdrSerdes<T>> {
    pub entity: EndpointEntity,
    queue: Arc<BoundedQueue<Sample>>,
    _inner: zenoh::pubsub::Subscriber<()>,
    _lv_token: LivelinessToken,
    _phantom_data: PhantomData<(T, S)>,
}

impl<T, S> ZSub<T, S>
where
    T: ZMessage,
    S: for<'a> ZDeserializer<Input<'a> = &'a [u8]>,
{
    /// Receive and deserialize the next message, blocking until one arrives
    #[tracing::instrument(name = "recv", skip(self), fields(
        topic = %self.entity.topic,
        payload_len = tracing::field::Empty
    ))]
    pub fn recv(&self) -> Result<S::Output> {
        trace!("[SUB] Waiting for message");
        let sample = self.queue.recv();
        let payload = sample.payload().to_bytes();
        tracing::Span::current().record("payload_len", payload.len());
        S::deserialize(&payload).map_err(|e| zenoh::Error::from(e.to_string()))
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<S::Output> {
        let sample = self
            .queue
            .recv_timeout(timeout)
            .ok_or_else(|| zenoh::Error::from("Receive timed out"))?;
        let payload = sample.payload().to_bytes();
        S::deserialize(&payload).map_err(|e| zenoh::Error::from(e.to_string()))
    }

    pub fn try_recv(&self) -> Option<Result<S::Output>> {
        let sample = self.queue.try_recv()?;
        let payload = sample.payload().to_bytes();
        Some(S::deserialize(&payload).map_err(|e| zenoh::Error::from(e.to_string())))
    }

    /// Check if there are messages waiting in the queue
    pub fn is_ready(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl<T, S> ZSub<T, S>
where
    T: ZMessage,
    S: ZDeserializer,
{
    /// Receive the next raw sample, keeping payload and attachment intact
    pub fn recv_serialized_timeout(&self, timeout: Duration) -> Result<Sample> {
        self.queue
            .recv_timeout(timeout)
            .ok_or_else(|| zenoh::Error::from("Receive timed out"))
    }
}
