//! Test service builder.
//! Given an AppState, build an initialized Actix **test service** carrying
//! the same middleware stack as `main.rs`.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::Error as ActixError;
use actix_web::{
    web::{self, ServiceConfig},
    App,
};

use crate::config::access::AccessPolicy;
use crate::error::AppError;
use crate::middleware::cors::{cors_middleware, parse_allowed_origins};
use crate::middleware::request_trace::RequestTrace;
use crate::middleware::structured_logger::StructuredLogger;
use crate::middleware::trace_span::TraceSpan;
use crate::state::app_state::AppState;

/// Function pointer for custom route configuration.
type RoutesFn = Box<dyn FnOnce(&mut ServiceConfig) + Send>;

pub fn create_test_app_builder(state: AppState) -> TestAppBuilder {
    TestAppBuilder {
        state,
        router: Router::Unset,
        policy: AccessPolicy::default(),
    }
}

enum Router {
    Unset,
    Prod,
    Custom(RoutesFn),
}

pub struct TestAppBuilder {
    state: AppState,
    router: Router,
    policy: AccessPolicy,
}

impl TestAppBuilder {
    /// Use the application's production routes.
    pub fn with_prod_routes(mut self) -> Self {
        self.router = Router::Prod;
        self
    }

    /// Guard resources per `policy` instead of the default (cart only).
    pub fn with_access_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use custom routes for a test.
    pub fn with_routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceConfig) + Send + 'static,
    {
        self.router = Router::Custom(Box::new(f));
        self
    }

    /// Build and initialize the Actix test service.
    pub async fn build(
        self,
    ) -> Result<
        impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = ActixError>,
        AppError,
    > {
        let policy = self.policy;
        let origins = parse_allowed_origins(None);

        let app = App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state.clone()));

        let app = match self.router {
            Router::Unset | Router::Prod => {
                app.configure(move |cfg| crate::routes::configure(cfg, &policy))
            }
            Router::Custom(f) => app.configure(f),
        };

        Ok(actix_web::test::init_service(app).await)
    }
}

