pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod presentation;
pub mod report;
pub mod terminal;

#[cfg(feature = "tauri-app")]
mod tauri_app {
    use crate::chat::{ChatService, Conversation, ConversationSnapshot, HealthStatus, SessionInfo, TriageApiClient};
    use crate::config::AppConfig;
    use crate::presentation::{triage_carousel, Carousel, Feature, Hero, SplashSequence, SplashStage, TriageSlide, FEATURES, HERO};
    use crate::report::{ReportView, Route};
    use serde::Serialize;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tauri::State;

    struct AppState {
        chat: Arc<ChatService>,
        api: Arc<TriageApiClient>,
        carousel: Mutex<Carousel<TriageSlide>>,
        splash: SplashSequence,
    }

    #[derive(Serialize)]
    struct Landing {
        hero: Hero,
        features: &'static [Feature],
    }

    #[derive(Serialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    enum ReportMount {
        Render { view: ReportView },
        Redirect { path: &'static str },
    }

    #[derive(Serialize)]
    struct SlideState {
        index: usize,
        total: usize,
        slide: TriageSlide,
    }

    impl SlideState {
        fn of(carousel: &Carousel<TriageSlide>) -> Self {
            Self {
                index: carousel.index(),
                total: carousel.len(),
                slide: carousel.current().clone(),
            }
        }
    }

    #[tauri::command]
    fn splash_stage(elapsed_ms: u64, state: State<'_, AppState>) -> SplashStage {
        state.splash.stage_at(Duration::from_millis(elapsed_ms))
    }

    #[tauri::command]
    fn get_landing() -> Landing {
        Landing { hero: HERO, features: FEATURES }
    }

    #[tauri::command]
    fn current_slide(state: State<'_, AppState>) -> Result<SlideState, String> {
        let carousel = state.carousel.lock().map_err(|e| e.to_string())?;
        Ok(SlideState::of(&carousel))
    }

    #[tauri::command]
    fn next_slide(state: State<'_, AppState>) -> Result<SlideState, String> {
        let mut carousel = state.carousel.lock().map_err(|e| e.to_string())?;
        carousel.next();
        Ok(SlideState::of(&carousel))
    }

    #[tauri::command]
    fn previous_slide(state: State<'_, AppState>) -> Result<SlideState, String> {
        let mut carousel = state.carousel.lock().map_err(|e| e.to_string())?;
        carousel.previous();
        Ok(SlideState::of(&carousel))
    }

    #[tauri::command]
    fn go_to_slide(index: usize, state: State<'_, AppState>) -> Result<SlideState, String> {
        let mut carousel = state.carousel.lock().map_err(|e| e.to_string())?;
        carousel.go_to(index);
        Ok(SlideState::of(&carousel))
    }

    #[tauri::command]
    async fn get_conversation(state: State<'_, AppState>) -> Result<ConversationSnapshot, String> {
        Ok(state.chat.snapshot().await)
    }

    /// The error string is what the chat view shows inline; the transcript
    /// (with its fallback message) is fetched again through `get_conversation`.
    #[tauri::command]
    async fn send_chat_message(message: String, state: State<'_, AppState>) -> Result<ConversationSnapshot, String> {
        state.chat.send(&message).await.map_err(|e| e.to_string())?;
        Ok(state.chat.snapshot().await)
    }

    #[tauri::command]
    async fn reset_conversation(state: State<'_, AppState>) -> Result<ConversationSnapshot, String> {
        Ok(state.chat.reset().await)
    }

    #[tauri::command]
    async fn open_report(state: State<'_, AppState>) -> Result<Route, String> {
        state.chat.open_report().await.map_err(|e| e.to_string())
    }

    #[tauri::command]
    fn mount_report_view(state: State<'_, AppState>) -> ReportMount {
        match state.chat.mount_report_view() {
            Route::Report(bundle) => ReportMount::Render { view: ReportView::from_bundle(&bundle) },
            other => ReportMount::Redirect { path: other.path() },
        }
    }

    #[tauri::command]
    async fn backend_health(state: State<'_, AppState>) -> Result<HealthStatus, String> {
        state.api.health().await.map_err(|e| e.to_string())
    }

    #[tauri::command]
    async fn session_info(state: State<'_, AppState>) -> Result<Option<SessionInfo>, String> {
        let Some(session_id) = state.chat.snapshot().await.session_id else {
            return Ok(None);
        };
        state.api.session_info(&session_id).await.map(Some).map_err(|e| e.to_string())
    }

    pub fn run(config: AppConfig) {
        tauri::async_runtime::set(tokio::runtime::Handle::current());

        let api = match TriageApiClient::from_config(&config.api) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                tracing::error!(error = %e, "could not build the backend client");
                return;
            }
        };
        let conversation = Conversation::new(config.ui.greeting.clone(), config.api.max_input_length);
        let app_state = AppState {
            chat: Arc::new(ChatService::new(api.clone(), conversation)),
            api,
            carousel: Mutex::new(triage_carousel()),
            splash: SplashSequence::from_config(&config.ui),
        };

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .manage(app_state)
            .invoke_handler(tauri::generate_handler![
                splash_stage,
                get_landing,
                current_slide,
                next_slide,
                previous_slide,
                go_to_slide,
                get_conversation,
                send_chat_message,
                reset_conversation,
                open_report,
                mount_report_view,
                backend_health,
                session_info,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "tauri-app")]
pub use tauri_app::run;
