use std::sync::Arc;

use ruta_connect::app_config::BookingRules;
use ruta_core::session::SessionContext;
use ruta_flow::BookingEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BookingEngine>,
    pub session_ctx: Arc<dyn SessionContext>,
    pub booking_rules: BookingRules,
}
