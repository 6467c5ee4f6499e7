use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Every `/api` route, with paths relative to the `/api` prefix.
pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(product_routes())
        .merge(category_routes())
        .merge(banner_routes())
        .merge(settings_routes())
        .routes(routes!(handlers::stats::get_stats))
        .merge(upload_routes(config))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::list_products,
            handlers::product::create_product
        ))
        .routes(routes!(
            handlers::product::update_product,
            handlers::product::delete_product
        ))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::list_categories,
            handlers::category::create_category
        ))
        .routes(routes!(
            handlers::category::update_category,
            handlers::category::delete_category
        ))
}

fn banner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::banner::list_active_banners,
            handlers::banner::create_banner
        ))
        .routes(routes!(handlers::banner::list_all_banners))
        .routes(routes!(
            handlers::banner::update_banner,
            handlers::banner::delete_banner
        ))
}

fn settings_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::settings::get_settings,
        handlers::settings::update_settings
    ))
}

fn upload_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_image))
        .layer(handlers::upload::upload_body_limit(
            config.storage.max_upload_size,
        ));

    OpenApiRouter::new()
        .routes(routes!(handlers::upload::download_upload))
        .merge(upload)
}
