use crate::domain::manager::GradeManager;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Whole-document persistence for a [`GradeManager`].
///
/// `save` replaces the stored document; `load` returns `Ok(None)` when nothing
/// has been stored yet. Errors stay on this side of the boundary: a failed load
/// never touches a manager the caller already holds.
#[async_trait]
pub trait GradeRepository: Send + Sync {
    async fn save(&self, manager: &GradeManager) -> Result<()>;
    async fn load(&self) -> Result<Option<GradeManager>>;
    fn location(&self) -> String;
}
