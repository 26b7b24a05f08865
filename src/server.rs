use crate::admin::AdminSite;
use crate::core::ports::repository::Manager;
use crate::error::Error;
use crate::handlers;
use crate::middlewares::allowed_hosts::AllowedHosts;
use crate::routes;
use crate::settings::Settings;
use crate::templates::Templates;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};

/// Everything a worker needs to build the app, shared across workers.
pub struct State<M> {
    pub manager: Data<M>,
    pub templates: Data<Templates>,
    pub site: Data<AdminSite>,
    pub settings: Data<Settings>,
}

impl<M> Clone for State<M> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            templates: self.templates.clone(),
            site: self.site.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<M> State<M> {
    pub fn new(manager: M, settings: Settings) -> Result<Self, Error> {
        Ok(Self {
            manager: Data::new(manager),
            templates: Data::new(Templates::new(&settings)?),
            site: Data::new(AdminSite::default()),
            settings: Data::new(settings),
        })
    }
}

/// Logger wraps host validation, which wraps slash normalisation, which wraps the routes.
pub fn build_app<M>(
    state: State<M>,
) -> App<impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error, InitError = ()>>
where
    M: Manager + 'static,
{
    let admin_enabled = state.settings.admin_enabled;
    let allowed_hosts = AllowedHosts::new(state.settings.effective_allowed_hosts());
    App::new()
        .wrap(NormalizePath::new(TrailingSlash::Always))
        .wrap(allowed_hosts)
        .wrap(Logger::default())
        .app_data(state.manager)
        .app_data(state.templates)
        .app_data(state.site)
        .app_data(state.settings)
        .configure(routes::public::<M>)
        .configure(|cfg| {
            if admin_enabled {
                routes::admin_site::<M>(cfg);
            }
        })
        .default_service(web::to(handlers::not_found))
}

pub async fn serve<M>(manager: M, settings: Settings) -> Result<(), Error>
where
    M: Manager + Send + Sync + 'static,
{
    let (host, port) = settings.bind_address();
    if settings.admin_enabled {
        log::info!("admin site enabled at /admin/");
    }
    let state = State::new(manager, settings)?;
    log::info!("listening on {}:{}", host, port);
    HttpServer::new(move || build_app(state.clone())).bind((host.as_str(), port))?.run().await?;
    Ok(())
}
