//! Shared state handed to the HTTP and WebSocket handlers.

use std::sync::Arc;

use crate::usecase::{GetParticipantsUseCase, LifecycleCoordinator};

/// Shared application state
pub struct AppState {
    /// Lifecycle coordinator shared by every connection worker
    pub coordinator: Arc<LifecycleCoordinator>,
    /// GetParticipantsUseCase（参加者一覧取得のユースケース）
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
}
