//! Request handler definitions
//!
//! Define each route and its handler here. Anything involving the provider lives in the engine; handlers only
//! translate between HTTP and the engine APIs.
//!
//! Every engine call is async, so none of these handlers block a worker thread. Keep it that way: a blocking call in a
//! handler stalls every other request queued on the same worker.
use std::time::Duration;

use actix_web::{get, http::header, web, HttpResponse, Responder};
use log::*;
use print_relay_engine::{
    token_store::TokenStore,
    traits::MerchantProvider,
    LatestOrderApi,
    PollerControl,
    TokenManager,
};
use serde_json::json;

use crate::{
    data_objects::{CallbackParams, JsonResponse, StartPollingParams},
    errors::ServerError,
    helpers::{html_escape, html_page},
};

/// The provider's OAuth authorization page, including client id and redirect URI.
#[derive(Debug, Clone)]
pub struct AuthorizeUrl(pub String);

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   OAuth  ----------------------------------------------------
#[get("/oauth/login")]
pub async fn oauth_login(authorize_url: web::Data<AuthorizeUrl>) -> impl Responder {
    trace!("💻️ Redirecting to the authorization page");
    HttpResponse::Found().insert_header((header::LOCATION, authorize_url.0.as_str())).finish()
}

route!(oauth_callback => Get "/callback" impl TokenStore, MerchantProvider);
/// The OAuth redirect target.
///
/// Clover calls this with either a `code`, which is exchanged for a token pair and persisted, or an `error` (and
/// `error_description`), in which case nothing is exchanged and a failure page is shown.
pub async fn oauth_callback<S, P>(
    query: web::Query<CallbackParams>,
    tokens: web::Data<TokenManager<S, P>>,
) -> Result<HttpResponse, ServerError>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    let params = query.into_inner();
    if let Some(error) = params.error {
        let description = params.error_description.unwrap_or_default();
        warn!("💻️ Authorization was declined. {error}: {description}");
        let body = format!("<p>{}: {}</p>", html_escape(&error), html_escape(&description));
        return Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html_page("OAuth Failed", &body)));
    }
    let code = params.code.filter(|c| !c.is_empty()).ok_or(ServerError::MissingAuthorizationCode)?;
    debug!("💻️ Received authorization code");
    let record = tokens.exchange_code(&code).await.map_err(|e| {
        error!("💻️ Could not exchange the authorization code. {e}");
        ServerError::from(e)
    })?;
    info!("💻️ Authorized for merchant {}", record.merchant_id);
    let body = "<p>You can now close this window and start polling.</p>";
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html_page("OAuth Successful", body)))
}

//----------------------------------------------   Polling  ----------------------------------------------------
route!(start_polling => Post "/start" impl TokenStore, MerchantProvider);
pub async fn start_polling<S, P>(
    query: web::Query<StartPollingParams>,
    control: web::Data<PollerControl<S, P>>,
) -> Result<HttpResponse, ServerError>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    let interval = query.interval_ms.map(Duration::from_millis);
    let interval = control.start(interval).await?;
    debug!("💻️ Polling started with a {} ms interval", interval.as_millis());
    Ok(HttpResponse::Ok().json(JsonResponse::success("Polling started.")))
}

route!(stop_polling => Post "/stop" impl TokenStore, MerchantProvider);
pub async fn stop_polling<S, P>(control: web::Data<PollerControl<S, P>>) -> Result<HttpResponse, ServerError>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    control.stop().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Polling stopped.")))
}

route!(polling_status => Get "/status" impl TokenStore, MerchantProvider);
pub async fn polling_status<S, P>(control: web::Data<PollerControl<S, P>>) -> HttpResponse
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    trace!("💻️ Received polling status request");
    HttpResponse::Ok().json(control.status().await)
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(latest_order => Get "/latest-order" impl TokenStore, MerchantProvider);
/// Returns the merchant's most recent order exactly as the provider sent it.
///
/// This does not consult or update the poller's record of printed orders. If the access token has expired, it is
/// refreshed, but the request is not retried; the caller gets a 401 and should ask again.
pub async fn latest_order<S, P>(api: web::Data<LatestOrderApi<S, P>>) -> Result<HttpResponse, ServerError>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    trace!("💻️ Received latest order request");
    match api.fetch_latest_order().await? {
        Some(order) => {
            debug!("💻️ Latest order is {order}");
            Ok(HttpResponse::Ok().json(order.raw))
        },
        None => Ok(HttpResponse::Ok().json(json!({ "message": "No orders found." }))),
    }
}
