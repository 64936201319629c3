use async_trait::async_trait;

/// Decides whether a user may be handed a token for a video.
///
/// Ownership, subscription and purchase rules live behind this trait. The
/// check may do I/O; dropping the returned future abandons it.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn has_access(&self, subject: u64, video_id: &str) -> bool;
}

#[async_trait]
impl<F> AccessPolicy for F
where
    F: Fn(u64, &str) -> bool + Send + Sync,
{
    async fn has_access(&self, subject: u64, video_id: &str) -> bool {
        self(subject, video_id)
    }
}

/// Grants every request. Suitable when access is checked upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl AccessPolicy for AllowAll {
    async fn has_access(&self, _subject: u64, _video_id: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl AccessPolicy for DenyAll {
    async fn has_access(&self, _subject: u64, _video_id: &str) -> bool {
        false
    }
}
