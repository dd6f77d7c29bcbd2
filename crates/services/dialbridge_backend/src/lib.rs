// --- File: crates/services/dialbridge_backend/src/lib.rs ---

pub mod ui;

use axum::{routing::get, Router};
use dialbridge_config::TwilioCredentials;
use dialbridge_twilio::routes as twilio_routes;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Assembles the full gateway router: dial-form UI, Twilio webhook and REST
/// routes, and static assets.
pub fn app(credentials: Option<Arc<TwilioCredentials>>) -> Router {
    #[allow(unused_mut)] // mutable only with the openapi feature
    let mut app = Router::new()
        .route("/", get(ui::index))
        .merge(twilio_routes::routes(credentials))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        );

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use dialbridge_twilio::doc::TwilioApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Dialbridge API",
                version = "0.1.0",
                description = "Browser softphone gateway API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "Dialbridge", description = "Gateway endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(TwilioApiDoc::openapi());

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app
}
